// src/usuarios/auth_middleware.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

use super::usuario_structs::Claims;
use crate::erros::ApiError;
use crate::AppState;

/// Usuário autenticado, extraído do token JWT do cabeçalho Authorization.
#[derive(Debug, Clone)]
pub struct UsuarioLogado {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub nivel: i32,
}

impl UsuarioLogado {
    /// Guarda de autorização por nível (1 = comum, 2 = gestor, 3 = admin).
    pub fn exigir_nivel(&self, minimo: i32) -> Result<(), ApiError> {
        if self.nivel < minimo {
            return Err(ApiError::AcessoNegado);
        }
        Ok(())
    }
}

impl FromRequest for UsuarioLogado {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let jwt_secret = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.jwt_secret.clone(),
            None => {
                return ready(Err(ApiError::Configuracao(
                    "AppState indisponível no extrator de autenticação".to_string(),
                )));
            }
        };

        // Cabeçalho Authorization no formato "Bearer <token>"
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
        {
            Some(valor) if valor.starts_with("Bearer ") => {
                valor.trim_start_matches("Bearer ").to_string()
            }
            Some(_) => {
                return ready(Err(ApiError::Autenticacao(
                    "Formato de token inválido. Esperado 'Bearer <token>'.".to_string(),
                )));
            }
            None => {
                return ready(Err(ApiError::Autenticacao(
                    "Token de autenticação ausente.".to_string(),
                )));
            }
        };

        let validation = Validation::new(Algorithm::HS256);
        let token_data = match decode::<Claims>(
            &token,
            &DecodingKey::from_secret(jwt_secret.as_ref()),
            &validation,
        ) {
            Ok(data) => data,
            Err(e) => {
                let mensagem = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        "Assinatura do token inválida."
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
                    _ => "Token de autenticação inválido.",
                };
                return ready(Err(ApiError::Autenticacao(mensagem.to_string())));
            }
        };

        ready(Ok(UsuarioLogado {
            id: token_data.claims.sub,
            nome: token_data.claims.nome,
            email: token_data.claims.email,
            nivel: token_data.claims.nivel,
        }))
    }
}
