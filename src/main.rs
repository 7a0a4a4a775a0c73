// src/main.rs

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{get, web, App, HttpServer, Responder};
use sqlx::postgres::PgPoolOptions;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use hortifruti_api::config::AppConfig;
use hortifruti_api::email::notificador::{Notificador, NotificadorSmtp};
use hortifruti_api::{carrinho, dashboard, erros, feirantes, fotos, mercadorias, pedidos, usuarios};
use hortifruti_api::AppState;

#[get("/")]
async fn raiz() -> impl Responder {
    "API: Venda de Hortifrutis"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Configuração antes de qualquer recurso: sem DATABASE_URL/JWT_KEY
    // não há o que subir.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(erro = %e, "falha ao carregar configuração");
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    // Pool único de conexões, criado no startup e injetado nas rotas.
    let db_pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(erro = %e, "falha ao conectar ao Postgres");
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
        tracing::error!(erro = %e, "falha ao aplicar migrações");
        return Err(std::io::Error::other(e.to_string()));
    }

    let notificador: Arc<dyn Notificador> = match NotificadorSmtp::novo(&config) {
        Ok(n) => Arc::new(n),
        Err(e) => {
            tracing::error!(erro = %e, "falha ao configurar o transporte SMTP");
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let endereco = (config.host.clone(), config.port);
    let app_state = web::Data::new(AppState {
        db_pool,
        jwt_secret: config.jwt_key.clone(),
        notificador,
        http: reqwest::Client::new(),
        config,
    });

    tracing::info!(host = %endereco.0, porta = endereco.1, "iniciando API de venda de hortifrutis");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .app_data(erros::configurar_json())
            .service(raiz)
            // Módulo de Usuários (rotas de caminho fixo antes das rotas com {id})
            .service(usuarios::usuario_router::login_usuario)
            .service(usuarios::usuario_router::solicitar_recuperacao)
            .service(usuarios::usuario_router::alterar_senha)
            .service(usuarios::usuario_router::pesquisar_usuarios)
            .service(usuarios::usuario_router::listar_usuarios)
            .service(usuarios::usuario_router::cadastrar_usuario)
            .service(usuarios::usuario_router::buscar_usuario_por_id)
            .service(usuarios::usuario_router::atualizar_usuario)
            .service(usuarios::usuario_router::deletar_usuario)
            // Módulo de Feirantes
            .service(feirantes::feirante_router::pesquisar_feirantes)
            .service(feirantes::feirante_router::listar_feirantes)
            .service(feirantes::feirante_router::cadastrar_feirante)
            .service(feirantes::feirante_router::buscar_feirante_por_id)
            .service(feirantes::feirante_router::atualizar_feirante)
            .service(feirantes::feirante_router::deletar_feirante)
            // Módulo de Mercadorias
            .service(mercadorias::mercadoria_router::pesquisar_mercadorias)
            .service(mercadorias::mercadoria_router::listar_mercadorias)
            .service(mercadorias::mercadoria_router::cadastrar_mercadoria)
            .service(mercadorias::mercadoria_router::buscar_mercadoria_por_id)
            .service(mercadorias::mercadoria_router::atualizar_mercadoria)
            .service(mercadorias::mercadoria_router::deletar_mercadoria)
            // Módulo de Carrinho
            .service(carrinho::carrinho_router::listar_itens)
            .service(carrinho::carrinho_router::adicionar_item)
            .service(carrinho::carrinho_router::atualizar_quantidade)
            .service(carrinho::carrinho_router::listar_itens_do_usuario)
            .service(carrinho::carrinho_router::deletar_item)
            // Módulo de Pedidos
            .service(pedidos::pedido_router::finalizar_pedido)
            .service(pedidos::pedido_router::listar_pedidos)
            .service(pedidos::pedido_router::criar_pedido)
            .service(pedidos::pedido_router::atualizar_pedido)
            .service(pedidos::pedido_router::listar_pedidos_do_usuario)
            .service(pedidos::pedido_router::deletar_pedido)
            // Módulo de Fotos
            .service(fotos::foto_router::listar_fotos)
            .service(fotos::foto_router::cadastrar_foto)
            // Módulo de Dashboard (JWT + nível)
            .service(dashboard::dashboard_router::totais_gerais)
            .service(dashboard::dashboard_router::mercadorias_agrupadas)
            .service(dashboard::dashboard_router::usuarios_por_endereco)
    })
    .bind(endereco)?
    .run()
    .await
}
