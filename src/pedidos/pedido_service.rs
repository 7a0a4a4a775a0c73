// src/pedidos/pedido_service.rs
//
// Núcleo da API: finalização de carrinho (transação única: insere os
// pedidos e remove os itens do carrinho, ou nada) e atualização parcial
// de pedido com notificação por e-mail após o commit.

use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::pedido_structs::{
    AtualizarPedido, FinalizarPedido, PedidoDetalhado, PedidoDetalhadoRow, ResultadoFinalizacao,
    StatusPedido,
};
use crate::email::notificador::Notificador;
use crate::erros::ApiError;
use crate::shared::validacao::Validador;

const CONSULTA_DETALHADA: &str = "
    SELECT p.id, p.quantidade, p.status, p.mercadoria_id, p.usuario_id, p.created_at,
           u.nome AS usuario_nome, u.email AS usuario_email,
           m.nome AS mercadoria_nome, m.preco AS mercadoria_preco, m.unidade AS mercadoria_unidade
      FROM pedidos p
      JOIN usuarios u ON u.id = p.usuario_id
      JOIN mercadorias m ON m.id = p.mercadoria_id";

/// Valida o corpo da finalização antes de qualquer acesso ao banco.
/// Devolve o id do usuário já convertido para UUID.
pub fn validar_finalizacao(corpo: &FinalizarPedido) -> Result<Uuid, ApiError> {
    let mut v = Validador::novo();

    let usuario_id = match Uuid::parse_str(&corpo.usuario_id) {
        Ok(id) => Some(id),
        Err(_) => {
            v.erro("usuario_id", "deve ser um UUID válido");
            None
        }
    };

    for (i, item) in corpo.itens.iter().enumerate() {
        if item.quantidade < 1 {
            v.erro(
                &format!("itens[{i}].quantidade"),
                "deve ser um número positivo",
            );
        }
    }

    v.finalizar()?;
    usuario_id.ok_or_else(|| ApiError::campo("usuario_id", "deve ser um UUID válido"))
}

/// Converte o conteúdo do carrinho em pedidos, atomicamente.
///
/// Dentro de uma única transação: (a) insere um pedido PENDENTE por item,
/// (b) remove do carrinho as linhas listadas. Se a remoção atingir menos
/// linhas do que o esperado, outra finalização concorrente já consumiu
/// alguma e a transação inteira é desfeita. Lista vazia finaliza
/// trivialmente, sem tocar no banco. Nenhum e-mail é enviado aqui.
pub async fn finalizar_pedido(
    pool: &PgPool,
    corpo: &FinalizarPedido,
) -> Result<ResultadoFinalizacao, ApiError> {
    let usuario_id = validar_finalizacao(corpo)?;

    if corpo.itens.is_empty() {
        return Ok(ResultadoFinalizacao {
            novos_pedidos: 0,
            itens_removidos: 0,
        });
    }

    let quantidades: Vec<i32> = corpo.itens.iter().map(|i| i.quantidade).collect();
    let mercadorias: Vec<i32> = corpo.itens.iter().map(|i| i.mercadoria.id).collect();

    // Ids repetidos no corpo contam uma vez só na remoção.
    let mut ids_carrinho: Vec<i32> = corpo.itens.iter().map(|i| i.id).collect();
    ids_carrinho.sort_unstable();
    ids_carrinho.dedup();

    let mut tx = pool.begin().await?;

    let novos_pedidos = sqlx::query(
        "INSERT INTO pedidos (quantidade, status, mercadoria_id, usuario_id)
         SELECT t.quantidade, 'PENDENTE', t.mercadoria_id, $3
           FROM UNNEST($1::int[], $2::int[]) AS t(quantidade, mercadoria_id)",
    )
    .bind(&quantidades)
    .bind(&mercadorias)
    .bind(usuario_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let itens_removidos = sqlx::query("DELETE FROM carrinho WHERE id = ANY($1::int[])")
        .bind(&ids_carrinho)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if itens_removidos != ids_carrinho.len() as u64 {
        tx.rollback().await?;
        return Err(ApiError::Interno(
            "Ocorreu um erro ao finalizar o pedido.".to_string(),
        ));
    }

    tx.commit().await?;

    Ok(ResultadoFinalizacao {
        novos_pedidos,
        itens_removidos,
    })
}

/// Valida o patch: pelo menos um campo presente, quantidade >= 1.
pub fn validar_atualizacao(corpo: &AtualizarPedido) -> Result<(), ApiError> {
    if corpo.quantidade.is_none() && corpo.status.is_none() {
        return Err(ApiError::campo(
            "corpo",
            "Nenhum campo para atualizar foi fornecido.",
        ));
    }
    if let Some(quantidade) = corpo.quantidade {
        if quantidade < 1 {
            return Err(ApiError::campo("quantidade", "deve ser no mínimo 1"));
        }
    }
    Ok(())
}

/// Aplica um patch parcial ao pedido e o recarrega com usuário e
/// mercadoria. Campo ausente fica intocado (COALESCE); id inexistente
/// vira 404. O envio de e-mail NÃO acontece aqui: o chamador decide,
/// depois do commit.
pub async fn atualizar_pedido(
    pool: &PgPool,
    id: i32,
    corpo: &AtualizarPedido,
) -> Result<PedidoDetalhado, ApiError> {
    validar_atualizacao(corpo)?;

    let alteradas = sqlx::query(
        "UPDATE pedidos
            SET quantidade = COALESCE($2::int, quantidade),
                status = COALESCE($3::status_pedido, status)
          WHERE id = $1",
    )
    .bind(id)
    .bind(corpo.quantidade)
    .bind(corpo.status)
    .execute(pool)
    .await?
    .rows_affected();

    if alteradas == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Pedido {id} não encontrado"
        )));
    }

    buscar_pedido_detalhado(pool, id)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado(format!("Pedido {id} não encontrado")))
}

pub async fn buscar_pedido_detalhado(
    pool: &PgPool,
    id: i32,
) -> Result<Option<PedidoDetalhado>, ApiError> {
    let linha = sqlx::query_as::<Postgres, PedidoDetalhadoRow>(&format!(
        "{CONSULTA_DETALHADA} WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(linha.map(Into::into))
}

/// Conteúdo do e-mail de atualização de status.
pub struct EmailStatus {
    pub assunto: String,
    pub texto: String,
    pub html: String,
}

pub fn montar_email_status(nome: &str, mercadoria: &str, status: StatusPedido) -> EmailStatus {
    EmailStatus {
        assunto: format!("Atualização do seu pedido: {mercadoria}"),
        texto: format!(
            "Olá {nome},\n\nSeu pedido da mercadoria \"{mercadoria}\" agora está com status: {status}."
        ),
        html: format!(
            "<h3>Olá, {nome}</h3>\
             <p>Sua mercadoria: <strong>{mercadoria}</strong></p>\
             <p>Status do pedido: <strong>{status}</strong></p>\
             <p>Obrigado por comprar conosco!</p>"
        ),
    }
}

/// Envia o e-mail de mudança de status. Melhor esforço: o status já foi
/// gravado; falha de transporte é registrada e engolida, nunca desfaz a
/// atualização nem altera a resposta HTTP.
pub async fn notificar_mudanca_status(
    notificador: &dyn Notificador,
    pedido: &PedidoDetalhado,
    status: StatusPedido,
) {
    let email = montar_email_status(&pedido.usuario.nome, &pedido.mercadoria.nome, status);
    if let Err(erro) = notificador
        .enviar(&pedido.usuario.email, &email.assunto, &email.texto, &email.html)
        .await
    {
        tracing::warn!(
            %erro,
            pedido_id = pedido.id,
            para = %pedido.usuario.email,
            "falha ao enviar e-mail de atualização de status"
        );
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use mockall::predicate;
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::email::notificador::{ErroNotificacao, MockNotificador};
    use crate::pedidos::pedido_structs::{
        ItemFinalizacao, MercadoriaDoPedido, MercadoriaRef, UsuarioDoPedido,
    };

    fn corpo_finalizacao(itens: Vec<ItemFinalizacao>) -> FinalizarPedido {
        FinalizarPedido {
            usuario_id: "0b0f1c5e-2a1f-4a2b-9c3d-4e5f6a7b8c9d".to_string(),
            itens,
        }
    }

    fn pedido_exemplo() -> PedidoDetalhado {
        PedidoDetalhado {
            id: 42,
            quantidade: 2,
            status: StatusPedido::ACaminho,
            mercadoria_id: 7,
            usuario_id: Uuid::new_v4(),
            created_at: Utc::now(),
            usuario: UsuarioDoPedido {
                id: Uuid::new_v4(),
                nome: "Maria".to_string(),
                email: "maria@exemplo.com".to_string(),
            },
            mercadoria: MercadoriaDoPedido {
                id: 7,
                nome: "Tomate".to_string(),
                preco: BigDecimal::from(5),
                unidade: "kg".to_string(),
            },
        }
    }

    // Pool preguiçoso: nunca abre conexão; qualquer query falharia.
    fn pool_sem_conexao() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://nao-usado@localhost/nao-usado")
            .unwrap()
    }

    #[test]
    fn finalizacao_rejeita_uuid_malformado_antes_do_banco() {
        let corpo = FinalizarPedido {
            usuario_id: "nao-e-uuid".to_string(),
            itens: vec![],
        };
        match validar_finalizacao(&corpo) {
            Err(ApiError::Validacao(erros)) => assert_eq!(erros[0].campo, "usuario_id"),
            outro => panic!("esperava erro de validação, veio {outro:?}"),
        }
    }

    #[test]
    fn finalizacao_rejeita_quantidade_nao_positiva_apontando_o_item() {
        let corpo = corpo_finalizacao(vec![
            ItemFinalizacao {
                id: 1,
                quantidade: 2,
                mercadoria: MercadoriaRef { id: 10 },
            },
            ItemFinalizacao {
                id: 2,
                quantidade: 0,
                mercadoria: MercadoriaRef { id: 11 },
            },
        ]);
        match validar_finalizacao(&corpo) {
            Err(ApiError::Validacao(erros)) => {
                assert_eq!(erros.len(), 1);
                assert_eq!(erros[0].campo, "itens[1].quantidade");
            }
            outro => panic!("esperava erro de validação, veio {outro:?}"),
        }
    }

    #[tokio::test]
    async fn finalizacao_vazia_sucede_sem_tocar_no_banco() {
        // O pool nunca conecta: se a função tocasse o banco, o teste falharia.
        let pool = pool_sem_conexao();
        let resultado = finalizar_pedido(&pool, &corpo_finalizacao(vec![]))
            .await
            .unwrap();
        assert_eq!(
            resultado,
            ResultadoFinalizacao {
                novos_pedidos: 0,
                itens_removidos: 0
            }
        );
    }

    #[tokio::test]
    async fn patch_vazio_e_rejeitado_antes_do_banco() {
        let pool = pool_sem_conexao();
        let corpo = AtualizarPedido {
            quantidade: None,
            status: None,
        };
        let erro = atualizar_pedido(&pool, 1, &corpo).await.unwrap_err();
        assert!(matches!(erro, ApiError::Validacao(_)));
    }

    #[test]
    fn patch_com_quantidade_menor_que_um_e_rejeitado() {
        let corpo = AtualizarPedido {
            quantidade: Some(0),
            status: None,
        };
        assert!(matches!(
            validar_atualizacao(&corpo),
            Err(ApiError::Validacao(_))
        ));
    }

    #[test]
    fn email_de_status_contem_nome_mercadoria_e_status() {
        let email = montar_email_status("Maria", "Tomate", StatusPedido::Entregue);
        assert_eq!(email.assunto, "Atualização do seu pedido: Tomate");
        assert!(email.texto.contains("Olá Maria"));
        assert!(email.texto.contains("\"Tomate\""));
        assert!(email.texto.contains("ENTREGUE"));
        assert!(email.html.contains("<strong>Tomate</strong>"));
        assert!(email.html.contains("<strong>ENTREGUE</strong>"));
    }

    #[tokio::test]
    async fn notificacao_dispara_exatamente_uma_vez_para_o_email_do_usuario() {
        let mut notificador = MockNotificador::new();
        notificador
            .expect_enviar()
            .with(
                predicate::eq("maria@exemplo.com"),
                predicate::eq("Atualização do seu pedido: Tomate"),
                predicate::str::contains("A_CAMINHO"),
                predicate::str::contains("A_CAMINHO"),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let pedido = pedido_exemplo();
        notificar_mudanca_status(&notificador, &pedido, StatusPedido::ACaminho).await;
    }

    #[tokio::test]
    async fn falha_de_transporte_e_engolida() {
        let mut notificador = MockNotificador::new();
        notificador.expect_enviar().times(1).returning(|_, _, _, _| {
            Err(ErroNotificacao::Endereco(
                "@".parse::<lettre::Address>().unwrap_err(),
            ))
        });

        let pedido = pedido_exemplo();
        // Não retorna erro nem entra em pânico.
        notificar_mudanca_status(&notificador, &pedido, StatusPedido::Cancelado).await;
    }
}
