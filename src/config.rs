// src/config.rs

use std::env;

use crate::erros::ApiError;

/// Configuração da aplicação, carregada do ambiente (com suporte a `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_key: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub smtp_from: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_upload_preset: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ApiError> {
        // Carrega o arquivo .env, se existir.
        dotenvy::dotenv().ok();

        let obrigatoria = |nome: &str| {
            env::var(nome)
                .map_err(|_| ApiError::Configuracao(format!("variável de ambiente {nome} ausente")))
        };
        let ou_padrao = |nome: &str, padrao: &str| env::var(nome).unwrap_or_else(|_| padrao.to_string());

        let port = ou_padrao("PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ApiError::Configuracao(format!("PORT inválida: {e}")))?;
        let smtp_port = ou_padrao("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ApiError::Configuracao(format!("SMTP_PORT inválida: {e}")))?;

        Ok(Self {
            host: ou_padrao("HOST", "127.0.0.1"),
            port,
            database_url: obrigatoria("DATABASE_URL")?,
            jwt_key: obrigatoria("JWT_KEY")?,
            smtp_host: ou_padrao("SMTP_HOST", "localhost"),
            smtp_port,
            smtp_user: ou_padrao("SMTP_USER", ""),
            smtp_pass: ou_padrao("SMTP_PASS", ""),
            smtp_from: ou_padrao("SMTP_FROM", "no-reply@hortifruti.local"),
            cloudinary_cloud_name: ou_padrao("CLOUDINARY_CLOUD_NAME", "demo"),
            cloudinary_upload_preset: ou_padrao("CLOUDINARY_UPLOAD_PRESET", "ml_default"),
        })
    }
}
