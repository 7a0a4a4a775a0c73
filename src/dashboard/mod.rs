// src/dashboard/mod.rs

pub mod dashboard_router;
