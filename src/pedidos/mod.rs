// src/pedidos/mod.rs

// Structs de pedido e o enum de status
pub mod pedido_structs;
// Finalização de carrinho, patch parcial e notificação por e-mail
pub mod pedido_service;
// Rotas HTTP de pedidos
pub mod pedido_router;
