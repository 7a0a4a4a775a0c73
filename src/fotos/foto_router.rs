// src/fotos/foto_router.rs

use actix_web::{get, post, web, HttpResponse};
use sqlx::query_as;

use super::foto_structs::{CloudinaryResposta, Foto, FotoResposta, FotoRow, NovaFoto};
use crate::erros::ApiError;
use crate::shared::validacao::Validador;
use crate::AppState;

/// Rota para listar todas as fotos, com mercadoria e feirante.
#[get("/fotos")]
pub async fn listar_fotos(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let linhas = query_as::<_, FotoRow>(
        "SELECT fm.id, fm.descricao, fm.url, fm.mercadoria_id, fm.feirante_id,
                m.nome AS mercadoria_nome, f.nome AS feirante_nome
           FROM fotos_mercadorias fm
           JOIN mercadorias m ON m.id = fm.mercadoria_id
           JOIN feirantes f ON f.id = fm.feirante_id
          ORDER BY fm.id",
    )
    .fetch_all(&data.db_pool)
    .await?;

    let resposta: Vec<FotoResposta> = linhas.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(resposta))
}

/// Rota de cadastro de foto: sobe a imagem para o Cloudinary (upload
/// sem assinatura) e grava a URL devolvida.
#[post("/fotos")]
pub async fn cadastrar_foto(
    data: web::Data<AppState>,
    corpo: web::Json<NovaFoto>,
) -> Result<HttpResponse, ApiError> {
    let mut v = Validador::novo();
    v.min_caracteres("descricao", &corpo.descricao, 5);
    if corpo.imagem_base64.is_empty() {
        v.erro("imagem_base64", "Imagem não enviada");
    }
    v.finalizar()?;

    let url_upload = format!(
        "https://api.cloudinary.com/v1_1/{}/image/upload",
        data.config.cloudinary_cloud_name
    );
    let parametros = [
        (
            "file",
            format!("data:image/jpeg;base64,{}", corpo.imagem_base64),
        ),
        (
            "upload_preset",
            data.config.cloudinary_upload_preset.clone(),
        ),
        ("folder", "revenda".to_string()),
    ];

    let resposta_upload = data
        .http
        .post(&url_upload)
        .form(&parametros)
        .send()
        .await
        .map_err(|e| ApiError::Interno(format!("Falha ao enviar imagem: {e}")))?;

    if !resposta_upload.status().is_success() {
        let status = resposta_upload.status();
        tracing::error!(%status, "upload de imagem rejeitado pelo Cloudinary");
        return Err(ApiError::Interno(
            "Falha ao obter a URL da imagem enviada.".to_string(),
        ));
    }

    let upload: CloudinaryResposta = resposta_upload
        .json()
        .await
        .map_err(|e| ApiError::Interno(format!("Resposta de upload inválida: {e}")))?;

    let resultado = query_as::<_, Foto>(
        "INSERT INTO fotos_mercadorias (descricao, url, mercadoria_id, feirante_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id, descricao, url, mercadoria_id, feirante_id",
    )
    .bind(&corpo.descricao)
    .bind(&upload.secure_url)
    .bind(corpo.mercadoria_id)
    .bind(corpo.feirante_id)
    .fetch_one(&data.db_pool)
    .await;

    match resultado {
        Ok(foto) => Ok(HttpResponse::Created().json(foto)),
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => Err(ApiError::campo(
            "mercadoria_id/feirante_id",
            "mercadoria ou feirante inexistente",
        )),
        Err(e) => Err(e.into()),
    }
}
