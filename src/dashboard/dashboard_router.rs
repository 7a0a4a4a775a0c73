// src/dashboard/dashboard_router.rs

use actix_web::{get, web, HttpResponse};
use serde::Serialize;
use sqlx::FromRow;

use crate::erros::ApiError;
use crate::usuarios::auth_middleware::UsuarioLogado;
use crate::AppState;

// Rotas do painel administrativo. Exigem JWT válido com nível >= 2.
const NIVEL_GESTOR: i32 = 2;

#[derive(Serialize, FromRow)]
struct ContagemMercadoria {
    mercadoria: String,
    num: i64,
}

#[derive(Serialize, FromRow)]
struct ContagemEndereco {
    endereco: String,
    num: i64,
}

/// Totais gerais: usuários, feirantes e pedidos.
#[get("/dashboard/gerais")]
pub async fn totais_gerais(
    data: web::Data<AppState>,
    usuario: UsuarioLogado,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_nivel(NIVEL_GESTOR)?;

    let usuarios: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuarios")
        .fetch_one(&data.db_pool)
        .await?;
    let feirantes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feirantes")
        .fetch_one(&data.db_pool)
        .await?;
    let pedidos: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pedidos")
        .fetch_one(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "usuarios": usuarios,
        "feirantes": feirantes,
        "pedidos": pedidos,
    })))
}

/// Mercadorias agrupadas por nome, da mais ofertada para a menos.
#[get("/dashboard/feirantesMercadoria")]
pub async fn mercadorias_agrupadas(
    data: web::Data<AppState>,
    usuario: UsuarioLogado,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_nivel(NIVEL_GESTOR)?;

    let contagens = sqlx::query_as::<_, ContagemMercadoria>(
        "SELECT nome AS mercadoria, COUNT(*) AS num
           FROM mercadorias
          GROUP BY nome
          ORDER BY num DESC",
    )
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(contagens))
}

/// Usuários agrupados por endereço.
#[get("/dashboard/usuarioEndereco")]
pub async fn usuarios_por_endereco(
    data: web::Data<AppState>,
    usuario: UsuarioLogado,
) -> Result<HttpResponse, ApiError> {
    usuario.exigir_nivel(NIVEL_GESTOR)?;

    let contagens = sqlx::query_as::<_, ContagemEndereco>(
        "SELECT endereco, COUNT(*) AS num
           FROM usuarios
          GROUP BY endereco
          ORDER BY num DESC",
    )
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(contagens))
}
