// src/lib.rs

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::email::notificador::Notificador;

// Módulos de domínio da API. Cada pasta agrupa as rotas e structs
// de um recurso, no mesmo formato: `<dominio>_router.rs` + `<dominio>_structs.rs`.
pub mod carrinho;   // Itens de carrinho dos usuários
pub mod config;     // Carregamento de configuração via variáveis de ambiente
pub mod dashboard;  // Agregações para o painel administrativo
pub mod email;      // Notificações por e-mail (SMTP)
pub mod erros;      // Taxonomia de erros da API
pub mod feirantes;  // Vendedores
pub mod fotos;      // Fotos de mercadorias (upload para o Cloudinary)
pub mod mercadorias; // Produtos à venda
pub mod pedidos;    // Pedidos: finalização de carrinho e atualização de status
pub mod shared;     // Helpers compartilhados (validação e coerção numérica)
pub mod usuarios;   // Compradores, login e recuperação de senha

/// Estado compartilhado da aplicação: conexão com o banco, chave JWT,
/// transporte de e-mail e cliente HTTP. Criado uma única vez no startup
/// e injetado nas rotas via `web::Data`.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
    pub jwt_secret: String,
    pub notificador: Arc<dyn Notificador>,
    pub http: reqwest::Client,
    pub config: config::AppConfig,
}
