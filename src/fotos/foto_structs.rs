// src/fotos/foto_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::coercao::inteiro_flexivel;

/// Foto de mercadoria como persistida (a URL aponta para o Cloudinary).
#[derive(Serialize, FromRow)]
pub struct Foto {
    pub id: i32,
    pub descricao: String,
    pub url: String,
    pub mercadoria_id: i32,
    pub feirante_id: i32,
}

/// Corpo de cadastro de foto: metadados mais a imagem em base64, que é
/// repassada ao Cloudinary. Os ids chegam como número ou string (o
/// cliente envia formulários).
#[derive(Deserialize)]
pub struct NovaFoto {
    pub descricao: String,
    #[serde(deserialize_with = "inteiro_flexivel")]
    pub feirante_id: i32,
    #[serde(deserialize_with = "inteiro_flexivel")]
    pub mercadoria_id: i32,
    pub imagem_base64: String,
}

/// Campo relevante da resposta de upload do Cloudinary.
#[derive(Deserialize)]
pub struct CloudinaryResposta {
    pub secure_url: String,
}

/// Linha achatada da listagem com mercadoria e feirante.
#[derive(FromRow)]
pub struct FotoRow {
    pub id: i32,
    pub descricao: String,
    pub url: String,
    pub mercadoria_id: i32,
    pub feirante_id: i32,
    pub mercadoria_nome: String,
    pub feirante_nome: String,
}

#[derive(Serialize)]
pub struct FotoResposta {
    pub id: i32,
    pub descricao: String,
    pub url: String,
    pub mercadoria_id: i32,
    pub feirante_id: i32,
    pub mercadoria: ResumoNomeado,
    pub feirante: ResumoNomeado,
}

#[derive(Serialize)]
pub struct ResumoNomeado {
    pub id: i32,
    pub nome: String,
}

impl From<FotoRow> for FotoResposta {
    fn from(linha: FotoRow) -> Self {
        FotoResposta {
            id: linha.id,
            descricao: linha.descricao,
            url: linha.url,
            mercadoria: ResumoNomeado {
                id: linha.mercadoria_id,
                nome: linha.mercadoria_nome,
            },
            feirante: ResumoNomeado {
                id: linha.feirante_id,
                nome: linha.feirante_nome,
            },
            mercadoria_id: linha.mercadoria_id,
            feirante_id: linha.feirante_id,
        }
    }
}
