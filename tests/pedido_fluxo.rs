//! Testes de integração do fluxo de pedidos. Exigem um Postgres
//! acessível via DATABASE_URL; rode com `cargo test -- --ignored`.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::{test as teste_http, web, App};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use hortifruti_api::config::AppConfig;
use hortifruti_api::email::notificador::{ErroNotificacao, Notificador};
use hortifruti_api::erros::ApiError;
use hortifruti_api::pedidos::pedido_service;
use hortifruti_api::pedidos::pedido_structs::{
    AtualizarPedido, FinalizarPedido, ItemFinalizacao, MercadoriaRef, StatusPedido,
};
use hortifruti_api::{pedidos, AppState};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL não definida");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("falha ao conectar ao Postgres de teste");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("falha ao aplicar migrações");
    pool
}

/// Cria feirante, mercadoria e usuário de teste; devolve (usuario, mercadoria).
async fn fixtures(pool: &PgPool) -> (Uuid, i32) {
    let sufixo = Uuid::new_v4();

    let feirante_id: i32 = sqlx::query_scalar(
        "INSERT INTO feirantes (nome, email, senha, telefone)
         VALUES ('Feirante Teste', $1, 'hash', '11987654321') RETURNING id",
    )
    .bind(format!("feirante-{sufixo}@teste.com"))
    .fetch_one(pool)
    .await
    .expect("falha ao criar feirante");

    let mercadoria_id: i32 = sqlx::query_scalar(
        "INSERT INTO mercadorias (nome, preco, quantidade, foto, feirante_id)
         VALUES ('Tomate', 5.50, 100, 'http://foto/tomate.jpg', $1) RETURNING id",
    )
    .bind(feirante_id)
    .fetch_one(pool)
    .await
    .expect("falha ao criar mercadoria");

    let usuario_id: Uuid = sqlx::query_scalar(
        "INSERT INTO usuarios (nome, email, senha, telefone, endereco)
         VALUES ('Maria Teste', $1, 'hash', '11987654321', 'Rua A, 1') RETURNING id",
    )
    .bind(format!("usuario-{sufixo}@teste.com"))
    .fetch_one(pool)
    .await
    .expect("falha ao criar usuário");

    (usuario_id, mercadoria_id)
}

async fn item_no_carrinho(pool: &PgPool, usuario: Uuid, mercadoria: i32) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO carrinho (quantidade, mercadoria_id, usuario_id)
         VALUES (1.00, $1, $2) RETURNING id",
    )
    .bind(mercadoria)
    .bind(usuario)
    .fetch_one(pool)
    .await
    .expect("falha ao criar item do carrinho")
}

async fn contar_pedidos(pool: &PgPool, usuario: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM pedidos WHERE usuario_id = $1")
        .bind(usuario)
        .fetch_one(pool)
        .await
        .expect("falha ao contar pedidos")
}

async fn contar_carrinho(pool: &PgPool, usuario: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM carrinho WHERE usuario_id = $1")
        .bind(usuario)
        .fetch_one(pool)
        .await
        .expect("falha ao contar itens do carrinho")
}

/// Notificador que só conta os envios.
struct NotificadorContador {
    envios: AtomicUsize,
}

#[async_trait]
impl Notificador for NotificadorContador {
    async fn enviar(
        &self,
        _para: &str,
        _assunto: &str,
        _texto: &str,
        _html: &str,
    ) -> Result<(), ErroNotificacao> {
        self.envios.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn config_de_teste() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        jwt_key: "segredo-de-teste".to_string(),
        smtp_host: "localhost".to_string(),
        smtp_port: 587,
        smtp_user: String::new(),
        smtp_pass: String::new(),
        smtp_from: "no-reply@hortifruti.local".to_string(),
        cloudinary_cloud_name: "demo".to_string(),
        cloudinary_upload_preset: "ml_default".to_string(),
    }
}

fn corpo(usuario: Uuid, itens: Vec<(i32, i32, i32)>) -> FinalizarPedido {
    FinalizarPedido {
        usuario_id: usuario.to_string(),
        itens: itens
            .into_iter()
            .map(|(id, quantidade, mercadoria)| ItemFinalizacao {
                id,
                quantidade,
                mercadoria: MercadoriaRef { id: mercadoria },
            })
            .collect(),
    }
}

#[tokio::test]
#[ignore = "exige Postgres via DATABASE_URL"]
async fn finalizacao_cria_pedidos_e_limpa_carrinho() {
    let pool = pool().await;
    let (usuario, mercadoria) = fixtures(&pool).await;
    let item_a = item_no_carrinho(&pool, usuario, mercadoria).await;
    let item_b = item_no_carrinho(&pool, usuario, mercadoria).await;

    let resultado = pedido_service::finalizar_pedido(
        &pool,
        &corpo(usuario, vec![(item_a, 2, mercadoria), (item_b, 3, mercadoria)]),
    )
    .await
    .expect("finalização deveria suceder");

    assert_eq!(resultado.novos_pedidos, 2);
    assert_eq!(resultado.itens_removidos, 2);
    assert_eq!(contar_pedidos(&pool, usuario).await, 2);
    assert_eq!(contar_carrinho(&pool, usuario).await, 0);

    let status: Vec<StatusPedido> =
        sqlx::query_scalar("SELECT status FROM pedidos WHERE usuario_id = $1")
            .bind(usuario)
            .fetch_all(&pool)
            .await
            .expect("falha ao ler status");
    assert!(status.iter().all(|s| *s == StatusPedido::Pendente));
}

#[tokio::test]
#[ignore = "exige Postgres via DATABASE_URL"]
async fn item_inexistente_desfaz_a_transacao_inteira() {
    let pool = pool().await;
    let (usuario, mercadoria) = fixtures(&pool).await;
    let item = item_no_carrinho(&pool, usuario, mercadoria).await;

    // Um id de carrinho que não existe: nada pode ser criado nem removido.
    let erro = pedido_service::finalizar_pedido(
        &pool,
        &corpo(usuario, vec![(item, 1, mercadoria), (999_999_999, 1, mercadoria)]),
    )
    .await
    .expect_err("finalização deveria falhar");

    assert!(matches!(erro, ApiError::Interno(_)));
    assert_eq!(contar_pedidos(&pool, usuario).await, 0);
    assert_eq!(contar_carrinho(&pool, usuario).await, 1);
}

#[tokio::test]
#[ignore = "exige Postgres via DATABASE_URL"]
async fn dupla_finalizacao_concorrente_comita_exatamente_uma() {
    let pool = pool().await;
    let (usuario, mercadoria) = fixtures(&pool).await;
    let item = item_no_carrinho(&pool, usuario, mercadoria).await;

    let corpo_a = corpo(usuario, vec![(item, 1, mercadoria)]);
    let corpo_b = corpo(usuario, vec![(item, 1, mercadoria)]);

    let (a, b) = tokio::join!(
        pedido_service::finalizar_pedido(&pool, &corpo_a),
        pedido_service::finalizar_pedido(&pool, &corpo_b),
    );

    let sucessos = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(sucessos, 1, "exatamente uma finalização deve comitar");
    assert_eq!(contar_pedidos(&pool, usuario).await, 1);
    assert_eq!(contar_carrinho(&pool, usuario).await, 0);
}

#[tokio::test]
#[ignore = "exige Postgres via DATABASE_URL"]
async fn patch_parcial_preserva_o_campo_ausente() {
    let pool = pool().await;
    let (usuario, mercadoria) = fixtures(&pool).await;

    let pedido_id: i32 = sqlx::query_scalar(
        "INSERT INTO pedidos (quantidade, mercadoria_id, usuario_id)
         VALUES (4, $1, $2) RETURNING id",
    )
    .bind(mercadoria)
    .bind(usuario)
    .fetch_one(&pool)
    .await
    .expect("falha ao criar pedido");

    // Só status: quantidade intocada.
    let atualizado = pedido_service::atualizar_pedido(
        &pool,
        pedido_id,
        &AtualizarPedido {
            quantidade: None,
            status: Some(StatusPedido::Entregue),
        },
    )
    .await
    .expect("patch de status deveria suceder");
    assert_eq!(atualizado.status, StatusPedido::Entregue);
    assert_eq!(atualizado.quantidade, 4);
    assert_eq!(atualizado.usuario.nome, "Maria Teste");
    assert_eq!(atualizado.mercadoria.nome, "Tomate");
    assert_eq!(
        atualizado.mercadoria.preco,
        BigDecimal::from_str("5.50").expect("literal válido")
    );

    // Só quantidade: status intocado.
    let atualizado = pedido_service::atualizar_pedido(
        &pool,
        pedido_id,
        &AtualizarPedido {
            quantidade: Some(7),
            status: None,
        },
    )
    .await
    .expect("patch de quantidade deveria suceder");
    assert_eq!(atualizado.quantidade, 7);
    assert_eq!(atualizado.status, StatusPedido::Entregue);
}

#[tokio::test]
#[ignore = "exige Postgres via DATABASE_URL"]
async fn id_de_carrinho_repetido_no_corpo_conta_uma_vez_na_remocao() {
    let pool = pool().await;
    let (usuario, mercadoria) = fixtures(&pool).await;
    let item = item_no_carrinho(&pool, usuario, mercadoria).await;

    let resultado = pedido_service::finalizar_pedido(
        &pool,
        &corpo(usuario, vec![(item, 2, mercadoria), (item, 3, mercadoria)]),
    )
    .await
    .expect("finalização com id repetido deveria suceder");

    assert_eq!(resultado.novos_pedidos, 2);
    assert_eq!(resultado.itens_removidos, 1);
    assert_eq!(contar_pedidos(&pool, usuario).await, 2);
    assert_eq!(contar_carrinho(&pool, usuario).await, 0);
}

#[actix_web::test]
#[ignore = "exige Postgres via DATABASE_URL"]
async fn rota_de_patch_notifica_somente_quando_o_status_vem_no_corpo() {
    let pool = pool().await;
    let (usuario, mercadoria) = fixtures(&pool).await;

    let pedido_id: i32 = sqlx::query_scalar(
        "INSERT INTO pedidos (quantidade, mercadoria_id, usuario_id)
         VALUES (2, $1, $2) RETURNING id",
    )
    .bind(mercadoria)
    .bind(usuario)
    .fetch_one(&pool)
    .await
    .expect("falha ao criar pedido");

    let notificador = Arc::new(NotificadorContador {
        envios: AtomicUsize::new(0),
    });
    let estado = web::Data::new(AppState {
        db_pool: pool.clone(),
        jwt_secret: "segredo-de-teste".to_string(),
        notificador: notificador.clone(),
        http: reqwest::Client::new(),
        config: config_de_teste(),
    });
    let app = teste_http::init_service(
        App::new()
            .app_data(estado)
            .service(pedidos::pedido_router::atualizar_pedido),
    )
    .await;

    // Patch só de quantidade: nenhum e-mail.
    let req = teste_http::TestRequest::patch()
        .uri(&format!("/pedido/{pedido_id}"))
        .set_json(serde_json::json!({ "quantidade": 9 }))
        .to_request();
    let resposta = teste_http::call_service(&app, req).await;
    assert!(resposta.status().is_success());
    assert_eq!(notificador.envios.load(Ordering::SeqCst), 0);

    // Patch com status: exatamente um e-mail.
    let req = teste_http::TestRequest::patch()
        .uri(&format!("/pedido/{pedido_id}"))
        .set_json(serde_json::json!({ "status": "A_CAMINHO" }))
        .to_request();
    let resposta = teste_http::call_service(&app, req).await;
    assert!(resposta.status().is_success());
    assert_eq!(notificador.envios.load(Ordering::SeqCst), 1);
}

#[tokio::test]
#[ignore = "exige Postgres via DATABASE_URL"]
async fn patch_de_pedido_inexistente_vira_nao_encontrado() {
    let pool = pool().await;
    let erro = pedido_service::atualizar_pedido(
        &pool,
        999_999_999,
        &AtualizarPedido {
            quantidade: Some(1),
            status: None,
        },
    )
    .await
    .expect_err("patch deveria falhar");
    assert!(matches!(erro, ApiError::NaoEncontrado(_)));
}
