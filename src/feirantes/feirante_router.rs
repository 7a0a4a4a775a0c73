// src/feirantes/feirante_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::query_as;

use super::feirante_structs::{FeiranteResposta, NovoFeirante};
use crate::erros::ApiError;
use crate::shared::validacao::Validador;
use crate::AppState;

fn validar_feirante(corpo: &NovoFeirante) -> Result<(), ApiError> {
    let mut v = Validador::novo();
    v.min_caracteres("nome", &corpo.nome, 2);
    v.email("email", &corpo.email);
    v.senha_forte("senha", &corpo.senha);
    v.telefone("telefone", &corpo.telefone);
    v.finalizar()
}

fn hash_senha(senha: &str) -> Result<String, ApiError> {
    hash(senha, DEFAULT_COST).map_err(|e| ApiError::Interno(format!("Erro ao processar senha: {e}")))
}

/// Rota para listar todos os feirantes.
#[get("/feirantes")]
pub async fn listar_feirantes(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let feirantes = query_as::<_, FeiranteResposta>(
        "SELECT id, nome, email, telefone FROM feirantes ORDER BY id",
    )
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(feirantes))
}

/// Rota para cadastrar um novo feirante.
#[post("/feirantes")]
pub async fn cadastrar_feirante(
    data: web::Data<AppState>,
    corpo: web::Json<NovoFeirante>,
) -> Result<HttpResponse, ApiError> {
    validar_feirante(&corpo)?;

    let senha_hash = hash_senha(&corpo.senha)?;

    let resultado = query_as::<_, FeiranteResposta>(
        "INSERT INTO feirantes (nome, email, senha, telefone)
         VALUES ($1, $2, $3, $4)
         RETURNING id, nome, email, telefone",
    )
    .bind(&corpo.nome)
    .bind(&corpo.email)
    .bind(&senha_hash)
    .bind(&corpo.telefone)
    .fetch_one(&data.db_pool)
    .await;

    match resultado {
        Ok(feirante) => Ok(HttpResponse::Created().json(feirante)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(ApiError::campo("email", "E-mail já cadastrado."))
        }
        Err(e) => Err(e.into()),
    }
}

/// Rota de pesquisa de feirantes por nome (case-insensitive).
#[get("/feirantes/pesquisa/{termo}")]
pub async fn pesquisar_feirantes(
    data: web::Data<AppState>,
    termo: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let feirantes = query_as::<_, FeiranteResposta>(
        "SELECT id, nome, email, telefone FROM feirantes WHERE nome ILIKE '%' || $1 || '%'",
    )
    .bind(termo.as_str())
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(feirantes))
}

/// Rota de consulta de feirante pelo id. Retorna um objeto, não um array.
#[get("/feirantes/{id}")]
pub async fn buscar_feirante_por_id(
    data: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let feirante = query_as::<_, FeiranteResposta>(
        "SELECT id, nome, email, telefone FROM feirantes WHERE id = $1",
    )
    .bind(*id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Feirante não encontrado".to_string()))?;

    Ok(HttpResponse::Ok().json(feirante))
}

/// Rota para atualizar um feirante.
#[put("/feirantes/{id}")]
pub async fn atualizar_feirante(
    data: web::Data<AppState>,
    id: web::Path<i32>,
    corpo: web::Json<NovoFeirante>,
) -> Result<HttpResponse, ApiError> {
    validar_feirante(&corpo)?;

    let senha_hash = hash_senha(&corpo.senha)?;

    let feirante = query_as::<_, FeiranteResposta>(
        "UPDATE feirantes SET nome = $2, email = $3, senha = $4, telefone = $5
         WHERE id = $1
         RETURNING id, nome, email, telefone",
    )
    .bind(*id)
    .bind(&corpo.nome)
    .bind(&corpo.email)
    .bind(&senha_hash)
    .bind(&corpo.telefone)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Feirante não encontrado".to_string()))?;

    Ok(HttpResponse::Ok().json(feirante))
}

/// Rota para remover um feirante.
#[delete("/feirantes/{id}")]
pub async fn deletar_feirante(
    data: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let feirante = query_as::<_, FeiranteResposta>(
        "DELETE FROM feirantes WHERE id = $1 RETURNING id, nome, email, telefone",
    )
    .bind(*id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Feirante não encontrado".to_string()))?;

    Ok(HttpResponse::Ok().json(feirante))
}
