// src/carrinho/carrinho_router.rs

use std::str::FromStr;

use actix_web::{delete, get, patch, post, web, HttpResponse};
use bigdecimal::BigDecimal;
use sqlx::query_as;
use uuid::Uuid;

use super::carrinho_structs::{
    AtualizarQuantidade, ItemCarrinho, ItemCarrinhoResposta, ItemCarrinhoRow, NovoItemCarrinho,
};
use crate::erros::ApiError;
use crate::AppState;

/// Rota para listar todos os itens do carrinho, com usuário e mercadoria.
#[get("/carrinho")]
pub async fn listar_itens(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let linhas = query_as::<_, ItemCarrinhoRow>(
        "SELECT c.id, c.quantidade, c.mercadoria_id, c.usuario_id,
                m.nome AS mercadoria_nome, m.preco AS mercadoria_preco, m.unidade AS mercadoria_unidade,
                u.nome AS usuario_nome, u.email AS usuario_email
           FROM carrinho c
           JOIN mercadorias m ON m.id = c.mercadoria_id
           JOIN usuarios u ON u.id = c.usuario_id
          ORDER BY c.id DESC",
    )
    .fetch_all(&data.db_pool)
    .await?;

    let resposta: Vec<ItemCarrinhoResposta> = linhas.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(resposta))
}

/// Rota para adicionar um item ao carrinho.
#[post("/carrinho")]
pub async fn adicionar_item(
    data: web::Data<AppState>,
    corpo: web::Json<NovoItemCarrinho>,
) -> Result<HttpResponse, ApiError> {
    let minimo = BigDecimal::from_str("0.01").unwrap_or_else(|_| BigDecimal::from(0));
    if corpo.quantidade < minimo {
        return Err(ApiError::campo("quantidade", "Quantidade mínima é 0.01"));
    }

    let resultado = query_as::<_, ItemCarrinho>(
        "INSERT INTO carrinho (quantidade, mercadoria_id, usuario_id)
         VALUES ($1, $2, $3)
         RETURNING id, quantidade, mercadoria_id, usuario_id",
    )
    .bind(&corpo.quantidade)
    .bind(corpo.mercadoria_id)
    .bind(corpo.usuario_id)
    .fetch_one(&data.db_pool)
    .await;

    match resultado {
        Ok(item) => Ok(HttpResponse::Created().json(item)),
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => Err(ApiError::campo(
            "mercadoria_id/usuario_id",
            "mercadoria ou usuário inexistente",
        )),
        Err(e) => Err(e.into()),
    }
}

/// Rota para atualizar a quantidade de um item do carrinho.
#[patch("/carrinho/{id}")]
pub async fn atualizar_quantidade(
    data: web::Data<AppState>,
    id: web::Path<i32>,
    corpo: web::Json<AtualizarQuantidade>,
) -> Result<HttpResponse, ApiError> {
    if corpo.quantidade <= BigDecimal::from(0) {
        return Err(ApiError::campo(
            "quantidade",
            "Informe uma quantidade válida (> 0)",
        ));
    }

    let item = query_as::<_, ItemCarrinho>(
        "UPDATE carrinho SET quantidade = $2 WHERE id = $1
         RETURNING id, quantidade, mercadoria_id, usuario_id",
    )
    .bind(*id)
    .bind(&corpo.quantidade)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Item do carrinho não encontrado".to_string()))?;

    Ok(HttpResponse::Ok().json(item))
}

/// Rota para listar os itens do carrinho de um usuário, com mercadoria.
#[get("/carrinho/{usuario_id}")]
pub async fn listar_itens_do_usuario(
    data: web::Data<AppState>,
    usuario_id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let linhas = query_as::<_, ItemCarrinhoRow>(
        "SELECT c.id, c.quantidade, c.mercadoria_id, c.usuario_id,
                m.nome AS mercadoria_nome, m.preco AS mercadoria_preco, m.unidade AS mercadoria_unidade,
                NULL::text AS usuario_nome, NULL::text AS usuario_email
           FROM carrinho c
           JOIN mercadorias m ON m.id = c.mercadoria_id
          WHERE c.usuario_id = $1
          ORDER BY c.id",
    )
    .bind(*usuario_id)
    .fetch_all(&data.db_pool)
    .await?;

    let resposta: Vec<ItemCarrinhoResposta> = linhas.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(resposta))
}

/// Rota para remover um item do carrinho. Devolve o item removido.
#[delete("/carrinho/{id}")]
pub async fn deletar_item(
    data: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let item = query_as::<_, ItemCarrinho>(
        "DELETE FROM carrinho WHERE id = $1
         RETURNING id, quantidade, mercadoria_id, usuario_id",
    )
    .bind(*id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Item do carrinho não encontrado".to_string()))?;

    Ok(HttpResponse::Ok().json(item))
}
