// src/feirantes/feirante_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Projeção de feirante devolvida pela API (sem o hash da senha).
#[derive(Serialize, FromRow)]
pub struct FeiranteResposta {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub telefone: String,
}

/// Corpo de cadastro/atualização de feirante.
#[derive(Deserialize)]
pub struct NovoFeirante {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub telefone: String,
}
