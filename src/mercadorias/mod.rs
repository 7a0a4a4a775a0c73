// src/mercadorias/mod.rs

pub mod mercadoria_structs;
pub mod mercadoria_router;
