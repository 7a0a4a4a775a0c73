// src/usuarios/usuario_router.rs

use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use rand::Rng;
use sqlx::query_as;
use uuid::Uuid;

use super::usuario_structs::{
    AlterarSenha, Claims, LoginRequest, LoginResposta, NovoUsuario, SolicitarRecuperacao, Usuario,
    UsuarioResposta,
};
use crate::erros::ApiError;
use crate::shared::validacao::Validador;
use crate::AppState;

const MENSAGEM_LOGIN: &str = "Login ou senha incorretos";

fn validar_usuario(corpo: &NovoUsuario) -> Result<(), ApiError> {
    let mut v = Validador::novo();
    v.min_caracteres("nome", &corpo.nome, 2);
    v.email("email", &corpo.email);
    v.senha_forte("senha", &corpo.senha);
    v.telefone("telefone", &corpo.telefone);
    v.min_caracteres("endereco", &corpo.endereco, 2);
    v.finalizar()
}

fn hash_senha(senha: &str) -> Result<String, ApiError> {
    hash(senha, DEFAULT_COST).map_err(|e| ApiError::Interno(format!("Erro ao processar senha: {e}")))
}

/// Rota para listar todos os usuários.
#[get("/usuarios")]
pub async fn listar_usuarios(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let usuarios = query_as::<_, UsuarioResposta>(
        "SELECT id, nome, email, telefone, endereco, nivel FROM usuarios ORDER BY nome",
    )
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(usuarios))
}

/// Rota para cadastrar um novo usuário.
#[post("/usuarios")]
pub async fn cadastrar_usuario(
    data: web::Data<AppState>,
    corpo: web::Json<NovoUsuario>,
) -> Result<HttpResponse, ApiError> {
    validar_usuario(&corpo)?;

    let senha_hash = hash_senha(&corpo.senha)?;

    let resultado = query_as::<_, UsuarioResposta>(
        "INSERT INTO usuarios (nome, email, senha, telefone, endereco)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, nome, email, telefone, endereco, nivel",
    )
    .bind(&corpo.nome)
    .bind(&corpo.email)
    .bind(&senha_hash)
    .bind(&corpo.telefone)
    .bind(&corpo.endereco)
    .fetch_one(&data.db_pool)
    .await;

    match resultado {
        Ok(usuario) => Ok(HttpResponse::Created().json(serde_json::json!({
            "message": "Usuário cadastrado com sucesso",
            "usuario": usuario,
        }))),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(ApiError::campo("email", "E-mail já cadastrado."))
        }
        Err(e) => Err(e.into()),
    }
}

/// Rota de login. Mensagem deliberadamente vaga para não revelar se o
/// e-mail existe.
#[post("/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    corpo: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    if corpo.email.is_empty() || corpo.senha.is_empty() {
        return Err(ApiError::Autenticacao(MENSAGEM_LOGIN.to_string()));
    }

    let usuario = query_as::<_, Usuario>("SELECT * FROM usuarios WHERE email = $1")
        .bind(&corpo.email)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ApiError::Autenticacao(MENSAGEM_LOGIN.to_string()))?;

    let senha_confere = verify(&corpo.senha, &usuario.senha)
        .map_err(|e| ApiError::Interno(format!("Erro ao verificar senha: {e}")))?;
    if !senha_confere {
        tracing::warn!(email = %corpo.email, "tentativa de acesso inválida");
        return Err(ApiError::Autenticacao(MENSAGEM_LOGIN.to_string()));
    }

    let claims = Claims {
        sub: usuario.id,
        nome: usuario.nome.clone(),
        email: usuario.email.clone(),
        nivel: usuario.nivel,
        exp: (Utc::now() + chrono::Duration::hours(1)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(data.jwt_secret.as_ref()),
    )
    .map_err(|e| ApiError::Interno(format!("Erro ao gerar token: {e}")))?;

    Ok(HttpResponse::Ok().json(LoginResposta {
        id: usuario.id,
        nome: usuario.nome,
        email: usuario.email,
        nivel: usuario.nivel,
        token,
    }))
}

/// Rota de pesquisa por nome ou telefone (case-insensitive).
#[get("/usuarios/pesquisa/{termo}")]
pub async fn pesquisar_usuarios(
    data: web::Data<AppState>,
    termo: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let usuarios = query_as::<_, UsuarioResposta>(
        "SELECT id, nome, email, telefone, endereco, nivel FROM usuarios
         WHERE nome ILIKE '%' || $1 || '%' OR telefone ILIKE '%' || $1 || '%'",
    )
    .bind(termo.as_str())
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(usuarios))
}

/// Rota para solicitar um código de recuperação de senha por e-mail.
#[post("/usuarios/solicitar-recuperacao")]
pub async fn solicitar_recuperacao(
    data: web::Data<AppState>,
    corpo: web::Json<SolicitarRecuperacao>,
) -> Result<HttpResponse, ApiError> {
    if corpo.email.is_empty() {
        return Err(ApiError::campo("email", "Email é obrigatório"));
    }

    let usuario = query_as::<_, Usuario>("SELECT * FROM usuarios WHERE email = $1")
        .bind(&corpo.email)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado("Usuario não encontrado".to_string()))?;

    // Código numérico de 6 dígitos
    let codigo = rand::thread_rng().gen_range(100_000..1_000_000).to_string();

    sqlx::query("UPDATE usuarios SET codigo_recuperacao = $1 WHERE email = $2")
        .bind(&codigo)
        .bind(&corpo.email)
        .execute(&data.db_pool)
        .await?;

    let texto = format!("Use este código para recuperar sua senha: {codigo}");
    let html = format!("<p>Use este código para recuperar sua senha: <strong>{codigo}</strong></p>");
    data.notificador
        .enviar(&usuario.email, "Código de recuperação de senha", &texto, &html)
        .await
        .map_err(|e| ApiError::Interno(format!("Falha ao enviar e-mail de recuperação: {e}")))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Código de recuperação enviado para seu email"
    })))
}

/// Rota para trocar a senha usando o código de recuperação.
#[patch("/usuarios/alterar-senha")]
pub async fn alterar_senha(
    data: web::Data<AppState>,
    corpo: web::Json<AlterarSenha>,
) -> Result<HttpResponse, ApiError> {
    if corpo.email.is_empty()
        || corpo.codigo_recuperacao.is_empty()
        || corpo.nova_senha.is_empty()
        || corpo.confirmar_senha.is_empty()
    {
        return Err(ApiError::campo("corpo", "Todos os campos são obrigatórios"));
    }
    if corpo.nova_senha != corpo.confirmar_senha {
        return Err(ApiError::campo("confirmarSenha", "As senhas não coincidem"));
    }
    let mut v = Validador::novo();
    v.senha_forte("novaSenha", &corpo.nova_senha);
    v.finalizar()?;

    let usuario = query_as::<_, Usuario>("SELECT * FROM usuarios WHERE email = $1")
        .bind(&corpo.email)
        .fetch_optional(&data.db_pool)
        .await?;

    let valido = usuario
        .as_ref()
        .and_then(|u| u.codigo_recuperacao.as_deref())
        .is_some_and(|c| c == corpo.codigo_recuperacao);
    if !valido {
        return Err(ApiError::campo(
            "codigoRecuperacao",
            "Código de recuperação inválido",
        ));
    }

    let senha_hash = hash_senha(&corpo.nova_senha)?;
    sqlx::query("UPDATE usuarios SET senha = $1, codigo_recuperacao = NULL WHERE email = $2")
        .bind(&senha_hash)
        .bind(&corpo.email)
        .execute(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Senha alterada com sucesso" })))
}

/// Rota de consulta de usuário pelo id. Retorna um objeto, não um array.
#[get("/usuarios/{id}")]
pub async fn buscar_usuario_por_id(
    data: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let usuario = query_as::<_, UsuarioResposta>(
        "SELECT id, nome, email, telefone, endereco, nivel FROM usuarios WHERE id = $1",
    )
    .bind(*id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Usuário não encontrado".to_string()))?;

    Ok(HttpResponse::Ok().json(usuario))
}

/// Rota para atualizar um usuário (corpo completo, como no cadastro).
#[put("/usuarios/{id}")]
pub async fn atualizar_usuario(
    data: web::Data<AppState>,
    id: web::Path<Uuid>,
    corpo: web::Json<NovoUsuario>,
) -> Result<HttpResponse, ApiError> {
    validar_usuario(&corpo)?;

    let senha_hash = hash_senha(&corpo.senha)?;

    let usuario = query_as::<_, UsuarioResposta>(
        "UPDATE usuarios SET nome = $2, email = $3, senha = $4, telefone = $5, endereco = $6
         WHERE id = $1
         RETURNING id, nome, email, telefone, endereco, nivel",
    )
    .bind(*id)
    .bind(&corpo.nome)
    .bind(&corpo.email)
    .bind(&senha_hash)
    .bind(&corpo.telefone)
    .bind(&corpo.endereco)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Usuário não encontrado".to_string()))?;

    Ok(HttpResponse::Ok().json(usuario))
}

/// Rota para remover um usuário.
#[delete("/usuarios/{id}")]
pub async fn deletar_usuario(
    data: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let usuario = query_as::<_, UsuarioResposta>(
        "DELETE FROM usuarios WHERE id = $1
         RETURNING id, nome, email, telefone, endereco, nivel",
    )
    .bind(*id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Usuário não encontrado".to_string()))?;

    Ok(HttpResponse::Ok().json(usuario))
}
