// src/feirantes/mod.rs

pub mod feirante_structs;
pub mod feirante_router;
