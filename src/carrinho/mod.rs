// src/carrinho/mod.rs

pub mod carrinho_structs;
pub mod carrinho_router;
