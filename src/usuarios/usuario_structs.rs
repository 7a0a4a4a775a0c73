// src/usuarios/usuario_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Linha completa da tabela `usuarios`, usada internamente (login e
/// recuperação de senha). Não deriva `Serialize`: o hash da senha e o
/// código de recuperação nunca saem em resposta.
#[derive(FromRow)]
pub struct Usuario {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub senha: String, // Hash bcrypt
    pub telefone: String,
    pub endereco: String,
    pub nivel: i32,
    pub codigo_recuperacao: Option<String>,
}

/// Projeção de usuário devolvida pela API (sem campos sensíveis).
#[derive(Serialize, FromRow)]
pub struct UsuarioResposta {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub endereco: String,
    pub nivel: i32,
}

/// Corpo de cadastro de um novo usuário.
#[derive(Deserialize)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String, // Senha em texto claro (hashed antes de salvar)
    pub telefone: String,
    pub endereco: String,
}

/// Corpo de login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

/// Payload do JWT emitido no login.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // ID do usuário
    pub nome: String,
    pub email: String,
    pub nivel: i32,
    pub exp: i64,      // Expiração (timestamp Unix)
}

/// Resposta de login bem-sucedido.
#[derive(Serialize)]
pub struct LoginResposta {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub nivel: i32,
    pub token: String,
}

/// Corpo da solicitação de código de recuperação de senha.
#[derive(Deserialize)]
pub struct SolicitarRecuperacao {
    pub email: String,
}

/// Corpo da troca de senha com código de recuperação.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlterarSenha {
    pub email: String,
    pub codigo_recuperacao: String,
    pub nova_senha: String,
    pub confirmar_senha: String,
}
