// src/mercadorias/mercadoria_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Categorias de mercadoria (enum fechado, espelhado no tipo `categoria`
/// do Postgres).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "categoria", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Categoria {
    Frutas,
    Legumes,
    Verduras,
    Temperos,
}

impl Categoria {
    /// Interpreta um termo de pesquisa como categoria, ignorando caixa.
    pub fn do_termo(termo: &str) -> Option<Self> {
        match termo.to_uppercase().as_str() {
            "FRUTAS" => Some(Categoria::Frutas),
            "LEGUMES" => Some(Categoria::Legumes),
            "VERDURAS" => Some(Categoria::Verduras),
            "TEMPEROS" => Some(Categoria::Temperos),
            _ => None,
        }
    }
}

/// Corpo de cadastro/atualização de mercadoria.
#[derive(Deserialize)]
pub struct NovaMercadoria {
    pub nome: String,
    pub preco: BigDecimal,
    pub quantidade: i32,
    pub categoria: Option<Categoria>, // padrão FRUTAS
    pub unidade: Option<String>,      // padrão "kg"
    pub foto: String,
    pub destaque: Option<bool>, // padrão true
    pub feirante_id: i32,
}

/// Foto agregada na listagem de mercadorias.
#[derive(Serialize, Deserialize)]
pub struct FotoResumo {
    pub id: i32,
    pub descricao: String,
    pub url: String,
}

/// Feirante aninhado na resposta de mercadoria.
#[derive(Serialize)]
pub struct FeiranteResumo {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub telefone: String,
}

/// Linha achatada da consulta de mercadorias com feirante e fotos agregadas.
#[derive(FromRow)]
pub struct MercadoriaRow {
    pub id: i32,
    pub nome: String,
    pub preco: BigDecimal,
    pub quantidade: i32,
    pub categoria: Categoria,
    pub unidade: String,
    pub foto: String,
    pub destaque: bool,
    pub feirante_id: i32,
    pub feirante_nome: String,
    pub feirante_email: String,
    pub feirante_telefone: String,
    pub fotos: Json<Vec<FotoResumo>>,
}

/// Resposta da API: mercadoria com feirante e fotos aninhados, no mesmo
/// formato dos `include` do cliente original.
#[derive(Serialize)]
pub struct MercadoriaResposta {
    pub id: i32,
    pub nome: String,
    pub preco: BigDecimal,
    pub quantidade: i32,
    pub categoria: Categoria,
    pub unidade: String,
    pub foto: String,
    pub destaque: bool,
    pub feirante_id: i32,
    pub feirante: FeiranteResumo,
    pub fotos: Vec<FotoResumo>,
}

impl From<MercadoriaRow> for MercadoriaResposta {
    fn from(linha: MercadoriaRow) -> Self {
        MercadoriaResposta {
            id: linha.id,
            nome: linha.nome,
            preco: linha.preco,
            quantidade: linha.quantidade,
            categoria: linha.categoria,
            unidade: linha.unidade,
            foto: linha.foto,
            destaque: linha.destaque,
            feirante: FeiranteResumo {
                id: linha.feirante_id,
                nome: linha.feirante_nome,
                email: linha.feirante_email,
                telefone: linha.feirante_telefone,
            },
            feirante_id: linha.feirante_id,
            fotos: linha.fotos.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termo_de_pesquisa_vira_categoria_sem_diferenciar_caixa() {
        assert_eq!(Categoria::do_termo("frutas"), Some(Categoria::Frutas));
        assert_eq!(Categoria::do_termo("TEMPEROS"), Some(Categoria::Temperos));
        assert_eq!(Categoria::do_termo("peixes"), None);
    }
}
