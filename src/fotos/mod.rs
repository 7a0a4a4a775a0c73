// src/fotos/mod.rs

pub mod foto_structs;
pub mod foto_router;
