// src/carrinho/carrinho_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::shared::coercao::decimal_flexivel;

/// Item do carrinho como persistido. Quantidade é decimal: hortifrutis
/// são vendidos por peso (0.5 kg de tomate).
#[derive(Serialize, FromRow)]
pub struct ItemCarrinho {
    pub id: i32,
    pub quantidade: BigDecimal,
    pub mercadoria_id: i32,
    pub usuario_id: Uuid,
}

/// Corpo de inclusão de item no carrinho. A quantidade pode chegar como
/// número ou string.
#[derive(Deserialize)]
pub struct NovoItemCarrinho {
    #[serde(deserialize_with = "decimal_flexivel")]
    pub quantidade: BigDecimal,
    pub mercadoria_id: i32,
    pub usuario_id: Uuid,
}

/// Corpo do PATCH de quantidade.
#[derive(Deserialize)]
pub struct AtualizarQuantidade {
    #[serde(deserialize_with = "decimal_flexivel")]
    pub quantidade: BigDecimal,
}

/// Linha achatada da listagem com mercadoria (e usuário) aninhados.
#[derive(FromRow)]
pub struct ItemCarrinhoRow {
    pub id: i32,
    pub quantidade: BigDecimal,
    pub mercadoria_id: i32,
    pub usuario_id: Uuid,
    pub mercadoria_nome: String,
    pub mercadoria_preco: BigDecimal,
    pub mercadoria_unidade: String,
    pub usuario_nome: Option<String>,
    pub usuario_email: Option<String>,
}

#[derive(Serialize)]
pub struct MercadoriaDoItem {
    pub id: i32,
    pub nome: String,
    pub preco: BigDecimal,
    pub unidade: String,
}

#[derive(Serialize)]
pub struct UsuarioDoItem {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
}

/// Resposta de item do carrinho com associações, no formato dos
/// `include` do cliente original.
#[derive(Serialize)]
pub struct ItemCarrinhoResposta {
    pub id: i32,
    pub quantidade: BigDecimal,
    pub mercadoria_id: i32,
    pub usuario_id: Uuid,
    pub mercadoria: MercadoriaDoItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario: Option<UsuarioDoItem>,
}

impl From<ItemCarrinhoRow> for ItemCarrinhoResposta {
    fn from(linha: ItemCarrinhoRow) -> Self {
        let usuario = match (linha.usuario_nome, linha.usuario_email) {
            (Some(nome), Some(email)) => Some(UsuarioDoItem {
                id: linha.usuario_id,
                nome,
                email,
            }),
            _ => None,
        };
        ItemCarrinhoResposta {
            id: linha.id,
            quantidade: linha.quantidade,
            mercadoria_id: linha.mercadoria_id,
            usuario_id: linha.usuario_id,
            mercadoria: MercadoriaDoItem {
                id: linha.mercadoria_id,
                nome: linha.mercadoria_nome,
                preco: linha.mercadoria_preco,
                unidade: linha.mercadoria_unidade,
            },
            usuario,
        }
    }
}
