// src/erros.rs

use actix_web::{web, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Detalhe de validação de um campo específico, no formato devolvido
/// no corpo `detalhes` das respostas 400.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErroCampo {
    pub campo: String,
    pub mensagem: String,
}

/// Taxonomia de erros da API. Validação e autenticação são detectadas
/// antes de qualquer acesso ao banco; `NaoEncontrado` é mapeado
/// uniformemente para 404 (o fonte original devolvia 500 em um dos
/// caminhos, tratado aqui como defeito e não como contrato).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Dados inválidos")]
    Validacao(Vec<ErroCampo>),

    #[error("{0}")]
    Autenticacao(String),

    #[error("Acesso negado. Nível insuficiente.")]
    AcessoNegado,

    #[error("{0}")]
    NaoEncontrado(String),

    #[error("Erro de banco de dados: {0}")]
    Persistencia(#[from] sqlx::Error),

    #[error("Erro de configuração: {0}")]
    Configuracao(String),

    #[error("{0}")]
    Interno(String),
}

impl ApiError {
    /// Atalho para um erro de validação de um único campo.
    pub fn campo(campo: &str, mensagem: &str) -> Self {
        ApiError::Validacao(vec![ErroCampo {
            campo: campo.to_string(),
            mensagem: mensagem.to_string(),
        }])
    }
}

/// Configuração do extrator JSON: corpo malformado (tipo errado,
/// status desconhecido, fração onde se espera inteiro) responde no
/// mesmo formato `{ erro, detalhes }` das validações de campo.
pub fn configurar_json() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|erro, _req| ApiError::campo("corpo", &erro.to_string()).into())
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validacao(detalhes) => {
                HttpResponse::BadRequest().json(json!({ "erro": "Dados inválidos", "detalhes": detalhes }))
            }
            ApiError::Autenticacao(m) => HttpResponse::Unauthorized().json(json!({ "erro": m })),
            ApiError::AcessoNegado => {
                HttpResponse::Forbidden().json(json!({ "erro": "Acesso negado. Nível insuficiente." }))
            }
            ApiError::NaoEncontrado(m) => HttpResponse::NotFound().json(json!({ "erro": m })),
            ApiError::Persistencia(e) => {
                tracing::error!(erro = %e, "falha de banco de dados");
                HttpResponse::InternalServerError().json(json!({ "erro": "Erro ao acessar o banco de dados" }))
            }
            ApiError::Configuracao(m) => {
                tracing::error!(erro = %m, "falha de configuração");
                HttpResponse::InternalServerError().json(json!({ "erro": "Erro de configuração do servidor" }))
            }
            ApiError::Interno(m) => {
                tracing::error!(erro = %m, "erro interno");
                HttpResponse::InternalServerError().json(json!({ "erro": m }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Corpo {
        #[allow(dead_code)]
        quantidade: i32,
    }

    async fn rota(_corpo: web::Json<Corpo>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn corpo_json_malformado_responde_no_formato_de_validacao() {
        let app = test::init_service(
            App::new()
                .app_data(configurar_json())
                .route("/x", web::post().to(rota)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/x")
            .set_json(serde_json::json!({ "quantidade": "abc" }))
            .to_request();
        let resposta = test::call_service(&app, req).await;

        assert_eq!(resposta.status(), StatusCode::BAD_REQUEST);
        let corpo: serde_json::Value = test::read_body_json(resposta).await;
        assert_eq!(corpo["erro"], "Dados inválidos");
        assert_eq!(corpo["detalhes"][0]["campo"], "corpo");
    }
}
