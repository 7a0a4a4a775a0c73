// src/pedidos/pedido_structs.rs

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::shared::coercao::{inteiro_flexivel, inteiro_flexivel_opcional};

/// Status de um pedido (enum fechado, espelhado no tipo `status_pedido`
/// do Postgres). Nenhuma restrição de transição é imposta: qualquer
/// status pode suceder qualquer outro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "status_pedido", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusPedido {
    Pendente,
    Confirmado,
    ACaminho,
    Entregue,
    Cancelado,
}

impl fmt::Display for StatusPedido {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let texto = match self {
            StatusPedido::Pendente => "PENDENTE",
            StatusPedido::Confirmado => "CONFIRMADO",
            StatusPedido::ACaminho => "A_CAMINHO",
            StatusPedido::Entregue => "ENTREGUE",
            StatusPedido::Cancelado => "CANCELADO",
        };
        f.write_str(texto)
    }
}

/// Pedido como persistido.
#[derive(Serialize, FromRow)]
pub struct Pedido {
    pub id: i32,
    pub quantidade: i32,
    pub status: StatusPedido,
    pub mercadoria_id: i32,
    pub usuario_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Corpo de criação avulsa de pedido.
#[derive(Deserialize)]
pub struct NovoPedido {
    #[serde(deserialize_with = "inteiro_flexivel")]
    pub quantidade: i32,
    pub status: StatusPedido,
    pub mercadoria_id: i32,
    pub usuario_id: Uuid,
}

/// Referência de mercadoria dentro de um item de finalização.
#[derive(Deserialize)]
pub struct MercadoriaRef {
    pub id: i32,
}

/// Item de carrinho a finalizar: o id da linha do carrinho (para
/// removê-la), a quantidade (número ou string) e a mercadoria alvo.
#[derive(Deserialize)]
pub struct ItemFinalizacao {
    pub id: i32,
    #[serde(deserialize_with = "inteiro_flexivel")]
    pub quantidade: i32,
    pub mercadoria: MercadoriaRef,
}

/// Corpo do POST /pedido/finalizar.
#[derive(Deserialize)]
pub struct FinalizarPedido {
    pub usuario_id: String,
    pub itens: Vec<ItemFinalizacao>,
}

/// Resultado da finalização: contagens de pedidos criados e itens
/// removidos do carrinho.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResultadoFinalizacao {
    #[serde(rename = "novosPedidos")]
    pub novos_pedidos: u64,
    #[serde(rename = "itensRemovidos")]
    pub itens_removidos: u64,
}

/// Corpo do PATCH /pedido/{id}. Patch parcial: campo ausente fica
/// intocado, campo presente substitui o valor gravado.
#[derive(Deserialize)]
pub struct AtualizarPedido {
    #[serde(default, deserialize_with = "inteiro_flexivel_opcional")]
    pub quantidade: Option<i32>,
    #[serde(default)]
    pub status: Option<StatusPedido>,
}

/// Usuário aninhado na resposta de pedido.
#[derive(Debug, Serialize)]
pub struct UsuarioDoPedido {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
}

/// Mercadoria aninhada na resposta de pedido.
#[derive(Debug, Serialize)]
pub struct MercadoriaDoPedido {
    pub id: i32,
    pub nome: String,
    pub preco: BigDecimal,
    pub unidade: String,
}

/// Linha achatada do pedido com usuário e mercadoria.
#[derive(FromRow)]
pub struct PedidoDetalhadoRow {
    pub id: i32,
    pub quantidade: i32,
    pub status: StatusPedido,
    pub mercadoria_id: i32,
    pub usuario_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub usuario_nome: String,
    pub usuario_email: String,
    pub mercadoria_nome: String,
    pub mercadoria_preco: BigDecimal,
    pub mercadoria_unidade: String,
}

/// Pedido com associações, devolvido pelo PATCH e pelas listagens.
#[derive(Debug, Serialize)]
pub struct PedidoDetalhado {
    pub id: i32,
    pub quantidade: i32,
    pub status: StatusPedido,
    pub mercadoria_id: i32,
    pub usuario_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub usuario: UsuarioDoPedido,
    pub mercadoria: MercadoriaDoPedido,
}

impl From<PedidoDetalhadoRow> for PedidoDetalhado {
    fn from(linha: PedidoDetalhadoRow) -> Self {
        PedidoDetalhado {
            id: linha.id,
            quantidade: linha.quantidade,
            status: linha.status,
            mercadoria_id: linha.mercadoria_id,
            usuario_id: linha.usuario_id,
            created_at: linha.created_at,
            usuario: UsuarioDoPedido {
                id: linha.usuario_id,
                nome: linha.usuario_nome,
                email: linha.usuario_email,
            },
            mercadoria: MercadoriaDoPedido {
                id: linha.mercadoria_id,
                nome: linha.mercadoria_nome,
                preco: linha.mercadoria_preco,
                unidade: linha.mercadoria_unidade,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalizacao_aceita_quantidade_como_numero_ou_string() {
        let corpo: FinalizarPedido = serde_json::from_str(
            r#"{
                "usuario_id": "0b0f1c5e-2a1f-4a2b-9c3d-4e5f6a7b8c9d",
                "itens": [
                    { "id": 1, "quantidade": 2, "mercadoria": { "id": 10 } },
                    { "id": 2, "quantidade": "3", "mercadoria": { "id": 11 } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(corpo.itens.len(), 2);
        assert_eq!(corpo.itens[0].quantidade, 2);
        assert_eq!(corpo.itens[1].quantidade, 3);
    }

    #[test]
    fn patch_distingue_campo_ausente_de_presente() {
        let so_status: AtualizarPedido = serde_json::from_str(r#"{"status": "ENTREGUE"}"#).unwrap();
        assert_eq!(so_status.quantidade, None);
        assert_eq!(so_status.status, Some(StatusPedido::Entregue));

        let so_quantidade: AtualizarPedido = serde_json::from_str(r#"{"quantidade": "5"}"#).unwrap();
        assert_eq!(so_quantidade.quantidade, Some(5));
        assert_eq!(so_quantidade.status, None);

        let vazio: AtualizarPedido = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(vazio.quantidade, None);
        assert_eq!(vazio.status, None);
    }

    #[test]
    fn status_desconhecido_e_rejeitado_na_desserializacao() {
        assert!(serde_json::from_str::<AtualizarPedido>(r#"{"status": "PERDIDO"}"#).is_err());
    }

    #[test]
    fn status_exibe_o_texto_do_banco() {
        assert_eq!(StatusPedido::ACaminho.to_string(), "A_CAMINHO");
        assert_eq!(StatusPedido::Pendente.to_string(), "PENDENTE");
    }
}
