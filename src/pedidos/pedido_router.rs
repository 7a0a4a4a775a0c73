// src/pedidos/pedido_router.rs

use actix_web::{delete, get, patch, post, web, HttpResponse};
use sqlx::query_as;
use uuid::Uuid;

use super::pedido_service;
use super::pedido_structs::{
    AtualizarPedido, FinalizarPedido, NovoPedido, Pedido, PedidoDetalhado, PedidoDetalhadoRow,
};
use crate::erros::ApiError;
use crate::AppState;

/// Rota transacional: cria um pedido por item do carrinho e limpa o
/// carrinho, tudo ou nada. Não envia e-mail.
#[post("/pedido/finalizar")]
pub async fn finalizar_pedido(
    data: web::Data<AppState>,
    corpo: web::Json<FinalizarPedido>,
) -> Result<HttpResponse, ApiError> {
    let resultado = pedido_service::finalizar_pedido(&data.db_pool, &corpo).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "mensagem": "Pedido finalizado com sucesso!",
        "novosPedidos": resultado.novos_pedidos,
        "itensRemovidos": resultado.itens_removidos,
    })))
}

/// Rota para listar todos os pedidos, com usuário e mercadoria.
#[get("/pedido")]
pub async fn listar_pedidos(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let linhas = query_as::<_, PedidoDetalhadoRow>(
        "SELECT p.id, p.quantidade, p.status, p.mercadoria_id, p.usuario_id, p.created_at,
                u.nome AS usuario_nome, u.email AS usuario_email,
                m.nome AS mercadoria_nome, m.preco AS mercadoria_preco, m.unidade AS mercadoria_unidade
           FROM pedidos p
           JOIN usuarios u ON u.id = p.usuario_id
           JOIN mercadorias m ON m.id = p.mercadoria_id
          ORDER BY p.id DESC",
    )
    .fetch_all(&data.db_pool)
    .await?;

    let resposta: Vec<PedidoDetalhado> = linhas.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(resposta))
}

/// Rota para criar um pedido avulso.
#[post("/pedido")]
pub async fn criar_pedido(
    data: web::Data<AppState>,
    corpo: web::Json<NovoPedido>,
) -> Result<HttpResponse, ApiError> {
    if corpo.quantidade < 1 {
        return Err(ApiError::campo("quantidade", "deve ser no mínimo 1"));
    }

    let pedido = query_as::<_, Pedido>(
        "INSERT INTO pedidos (quantidade, status, mercadoria_id, usuario_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id, quantidade, status, mercadoria_id, usuario_id, created_at",
    )
    .bind(corpo.quantidade)
    .bind(corpo.status)
    .bind(corpo.mercadoria_id)
    .bind(corpo.usuario_id)
    .fetch_one(&data.db_pool)
    .await?;

    Ok(HttpResponse::Created().json(pedido))
}

/// Rota de patch parcial de pedido. Grava primeiro; se o corpo trouxe
/// `status` (tenha ele mudado ou não), envia o e-mail de notificação
/// depois do commit, em melhor esforço.
#[patch("/pedido/{id}")]
pub async fn atualizar_pedido(
    data: web::Data<AppState>,
    id: web::Path<i32>,
    corpo: web::Json<AtualizarPedido>,
) -> Result<HttpResponse, ApiError> {
    let pedido = pedido_service::atualizar_pedido(&data.db_pool, *id, &corpo).await?;

    if let Some(status) = corpo.status {
        pedido_service::notificar_mudanca_status(data.notificador.as_ref(), &pedido, status).await;
    }

    Ok(HttpResponse::Ok().json(pedido))
}

/// Rota para listar os pedidos de um usuário, com mercadoria.
#[get("/pedido/{usuario_id}")]
pub async fn listar_pedidos_do_usuario(
    data: web::Data<AppState>,
    usuario_id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let linhas = query_as::<_, PedidoDetalhadoRow>(
        "SELECT p.id, p.quantidade, p.status, p.mercadoria_id, p.usuario_id, p.created_at,
                u.nome AS usuario_nome, u.email AS usuario_email,
                m.nome AS mercadoria_nome, m.preco AS mercadoria_preco, m.unidade AS mercadoria_unidade
           FROM pedidos p
           JOIN usuarios u ON u.id = p.usuario_id
           JOIN mercadorias m ON m.id = p.mercadoria_id
          WHERE p.usuario_id = $1
          ORDER BY p.id DESC",
    )
    .bind(*usuario_id)
    .fetch_all(&data.db_pool)
    .await?;

    let resposta: Vec<PedidoDetalhado> = linhas.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(resposta))
}

/// Rota administrativa para remover um pedido.
#[delete("/pedido/{id}")]
pub async fn deletar_pedido(
    data: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let pedido = query_as::<_, Pedido>(
        "DELETE FROM pedidos WHERE id = $1
         RETURNING id, quantidade, status, mercadoria_id, usuario_id, created_at",
    )
    .bind(*id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado(format!("Pedido {id} não encontrado")))?;

    Ok(HttpResponse::Ok().json(pedido))
}
