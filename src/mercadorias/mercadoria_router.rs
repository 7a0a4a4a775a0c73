// src/mercadorias/mercadoria_router.rs

use std::str::FromStr;

use actix_web::{delete, get, post, put, web, HttpResponse};
use bigdecimal::BigDecimal;
use sqlx::query_as;

use super::mercadoria_structs::{Categoria, MercadoriaResposta, MercadoriaRow, NovaMercadoria};
use crate::erros::ApiError;
use crate::shared::validacao::Validador;
use crate::AppState;

// Consulta base: mercadoria com feirante e fotos agregadas em json,
// equivalente ao include { feirante, fotos } do cliente original.
const CONSULTA_BASE: &str = "
    SELECT m.id, m.nome, m.preco, m.quantidade, m.categoria, m.unidade, m.foto, m.destaque,
           m.feirante_id,
           f.nome AS feirante_nome, f.email AS feirante_email, f.telefone AS feirante_telefone,
           COALESCE(json_agg(json_build_object('id', fm.id, 'descricao', fm.descricao, 'url', fm.url))
                    FILTER (WHERE fm.id IS NOT NULL), '[]') AS fotos
      FROM mercadorias m
      JOIN feirantes f ON f.id = m.feirante_id
      LEFT JOIN fotos_mercadorias fm ON fm.mercadoria_id = m.id";

const AGRUPAMENTO: &str = " GROUP BY m.id, f.id ORDER BY m.id";

fn validar_mercadoria(corpo: &NovaMercadoria) -> Result<(), ApiError> {
    let mut v = Validador::novo();
    v.min_caracteres("nome", &corpo.nome, 2);
    if corpo.preco < BigDecimal::from(0) {
        v.erro("preco", "deve ser um valor não negativo");
    }
    if corpo.quantidade < 0 {
        v.erro("quantidade", "deve ser um valor não negativo");
    }
    v.finalizar()
}

/// Rota para listar todas as mercadorias, com feirante e fotos.
#[get("/mercadorias")]
pub async fn listar_mercadorias(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let linhas = query_as::<_, MercadoriaRow>(&format!("{CONSULTA_BASE}{AGRUPAMENTO}"))
        .fetch_all(&data.db_pool)
        .await?;

    let resposta: Vec<MercadoriaResposta> = linhas.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(resposta))
}

/// Rota para cadastrar uma nova mercadoria.
#[post("/mercadorias")]
pub async fn cadastrar_mercadoria(
    data: web::Data<AppState>,
    corpo: web::Json<NovaMercadoria>,
) -> Result<HttpResponse, ApiError> {
    validar_mercadoria(&corpo)?;

    let categoria = corpo.categoria.unwrap_or(Categoria::Frutas);
    let unidade = corpo.unidade.clone().unwrap_or_else(|| "kg".to_string());
    let destaque = corpo.destaque.unwrap_or(true);

    let id: i32 = sqlx::query_scalar(
        "INSERT INTO mercadorias (nome, preco, quantidade, categoria, unidade, foto, destaque, feirante_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING id",
    )
    .bind(&corpo.nome)
    .bind(&corpo.preco)
    .bind(corpo.quantidade)
    .bind(categoria)
    .bind(&unidade)
    .bind(&corpo.foto)
    .bind(destaque)
    .bind(corpo.feirante_id)
    .fetch_one(&data.db_pool)
    .await?;

    let linha = buscar_linha(&data, id)
        .await?
        .ok_or_else(|| ApiError::Interno("Mercadoria recém-criada não encontrada".to_string()))?;
    Ok(HttpResponse::Created().json(MercadoriaResposta::from(linha)))
}

/// Rota de pesquisa: termo numérico filtra por preço máximo; termo de
/// texto procura por nome, nome do feirante ou categoria.
#[get("/mercadorias/pesquisa/{termo}")]
pub async fn pesquisar_mercadorias(
    data: web::Data<AppState>,
    termo: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let termo = termo.into_inner();

    let linhas = if termo.parse::<f64>().is_ok() {
        let preco_maximo = BigDecimal::from_str(termo.trim())
            .map_err(|_| ApiError::campo("termo", "valor de preço inválido"))?;
        query_as::<_, MercadoriaRow>(&format!(
            "{CONSULTA_BASE} WHERE m.preco <= $1{AGRUPAMENTO}"
        ))
        .bind(preco_maximo)
        .fetch_all(&data.db_pool)
        .await?
    } else {
        let categoria = Categoria::do_termo(&termo);
        query_as::<_, MercadoriaRow>(&format!(
            "{CONSULTA_BASE}
             WHERE m.nome ILIKE '%' || $1 || '%'
                OR f.nome ILIKE $1
                OR ($2::categoria IS NOT NULL AND m.categoria = $2::categoria)
             {AGRUPAMENTO}"
        ))
        .bind(&termo)
        .bind(categoria)
        .fetch_all(&data.db_pool)
        .await?
    };

    let resposta: Vec<MercadoriaResposta> = linhas.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(resposta))
}

/// Rota de consulta de mercadoria pelo id. Retorna um objeto, não um array.
#[get("/mercadorias/{id}")]
pub async fn buscar_mercadoria_por_id(
    data: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let linha = buscar_linha(&data, *id)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado("Mercadoria não encontrada".to_string()))?;
    Ok(HttpResponse::Ok().json(MercadoriaResposta::from(linha)))
}

/// Rota para atualizar uma mercadoria (corpo completo).
#[put("/mercadorias/{id}")]
pub async fn atualizar_mercadoria(
    data: web::Data<AppState>,
    id: web::Path<i32>,
    corpo: web::Json<NovaMercadoria>,
) -> Result<HttpResponse, ApiError> {
    validar_mercadoria(&corpo)?;

    let categoria = corpo.categoria.unwrap_or(Categoria::Frutas);
    let unidade = corpo.unidade.clone().unwrap_or_else(|| "kg".to_string());
    let destaque = corpo.destaque.unwrap_or(true);

    let alteradas = sqlx::query(
        "UPDATE mercadorias
            SET nome = $2, preco = $3, quantidade = $4, categoria = $5,
                unidade = $6, foto = $7, destaque = $8, feirante_id = $9
          WHERE id = $1",
    )
    .bind(*id)
    .bind(&corpo.nome)
    .bind(&corpo.preco)
    .bind(corpo.quantidade)
    .bind(categoria)
    .bind(&unidade)
    .bind(&corpo.foto)
    .bind(destaque)
    .bind(corpo.feirante_id)
    .execute(&data.db_pool)
    .await?
    .rows_affected();

    if alteradas == 0 {
        return Err(ApiError::NaoEncontrado("Mercadoria não encontrada".to_string()));
    }

    let linha = buscar_linha(&data, *id)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado("Mercadoria não encontrada".to_string()))?;
    Ok(HttpResponse::Ok().json(MercadoriaResposta::from(linha)))
}

/// Rota para remover uma mercadoria.
#[delete("/mercadorias/{id}")]
pub async fn deletar_mercadoria(
    data: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let removidas = sqlx::query("DELETE FROM mercadorias WHERE id = $1")
        .bind(*id)
        .execute(&data.db_pool)
        .await?
        .rows_affected();

    if removidas == 0 {
        return Err(ApiError::NaoEncontrado("Mercadoria não encontrada".to_string()));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": *id })))
}

async fn buscar_linha(
    data: &web::Data<AppState>,
    id: i32,
) -> Result<Option<MercadoriaRow>, ApiError> {
    let linha = query_as::<_, MercadoriaRow>(&format!(
        "{CONSULTA_BASE} WHERE m.id = $1{AGRUPAMENTO}"
    ))
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?;
    Ok(linha)
}
