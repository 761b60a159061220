// src/usuarios/usuario_router.rs

use actix_web::{delete, get, patch, post, web, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::query_as;

use super::auth_middleware::Admin;
use super::usuario_structs::{
    AuthResponse, Claims, LoginRequest, NovoUsuario, NovoUsuarioAdmin, Usuario, UsuarioAdmin,
};
use crate::shared::shared_structs::{erro_interno, AtualizarAtivo, GenericResponse};
use crate::AppState;

/// Validade do token emitido no login. A sessão expira depois de 2 horas,
/// o mesmo limite de inatividade aplicado na loja.
const VALIDADE_TOKEN: i64 = 2;

/// Rota para cadastrar um novo usuário da loja.
///
/// Além das credenciais, cria o perfil de cliente vinculado: o cliente passa
/// a existir já no cadastro, não apenas na primeira compra.
#[post("/usuarios/cadastro")]
pub async fn cadastrar_usuario(
    data: web::Data<AppState>,
    novo_usuario: web::Json<NovoUsuario>,
) -> HttpResponse {
    // 1. Verificar se o e-mail já está em uso
    let existente = query_as::<_, Usuario>(
        "SELECT id, nome, email, senha_hash FROM usuarios WHERE email = $1",
    )
    .bind(&novo_usuario.email)
    .fetch_optional(&data.db_pool)
    .await;

    match existente {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest()
                .json(GenericResponse::erro("E-mail já cadastrado."));
        }
        Err(e) => return erro_interno("Erro ao verificar e-mail existente", e),
        _ => {} // E-mail não encontrado, pode prosseguir
    }

    // 2. Hash da senha
    let senha_hash = match hash(&novo_usuario.senha, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => return erro_interno("Erro ao processar senha", e),
    };

    // 3. Inserir usuário e perfil de cliente na mesma transação
    let mut tx = match data.db_pool.begin().await {
        Ok(tx) => tx,
        Err(e) => return erro_interno("Erro ao iniciar transação de cadastro", e),
    };

    let usuario_id = match sqlx::query_scalar::<_, i32>(
        "INSERT INTO usuarios (nome, email, senha_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&novo_usuario.nome)
    .bind(&novo_usuario.email)
    .bind(&senha_hash)
    .fetch_one(&mut tx)
    .await
    {
        Ok(id) => id,
        Err(e) => return erro_interno("Erro ao inserir usuário", e),
    };

    if let Err(e) = sqlx::query(
        "INSERT INTO clientes (usuario_id, nome, email, telefone) VALUES ($1, $2, $3, $4)",
    )
    .bind(usuario_id)
    .bind(&novo_usuario.nome)
    .bind(&novo_usuario.email)
    .bind(&novo_usuario.telefone)
    .execute(&mut tx)
    .await
    {
        return erro_interno("Erro ao criar perfil de cliente", e);
    }

    if let Err(e) = tx.commit().await {
        return erro_interno("Erro ao concluir cadastro", e);
    }

    HttpResponse::Ok().json(GenericResponse::com_corpo(
        "Usuário cadastrado com sucesso!",
        serde_json::json!({ "id": usuario_id }),
    ))
}

/// Rota para login de usuário.
#[post("/usuarios/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    login_request: web::Json<LoginRequest>,
) -> HttpResponse {
    // 1. Buscar o usuário pelo e-mail
    let user_result = query_as::<_, Usuario>(
        "SELECT id, nome, email, senha_hash FROM usuarios WHERE email = $1",
    )
    .bind(&login_request.email)
    .fetch_optional(&data.db_pool)
    .await;

    let usuario = match user_result {
        Ok(Some(u)) => u,
        Ok(None) => {
            return HttpResponse::Unauthorized()
                .json(GenericResponse::erro("Credenciais inválidas."));
        }
        Err(e) => return erro_interno("Erro ao buscar usuário para login", e),
    };

    // 2. Verificar a senha
    let senha_confere = match verify(&login_request.senha, &usuario.senha_hash) {
        Ok(confere) => confere,
        Err(e) => return erro_interno("Erro ao verificar senha", e),
    };

    if !senha_confere {
        return HttpResponse::Unauthorized().json(GenericResponse::erro("Credenciais inválidas."));
    }

    // 3. Gerar o JWT
    let claims = Claims {
        sub: usuario.id,
        name: usuario.nome.clone(),
        email: usuario.email.clone(),
        exp: (Utc::now() + Duration::hours(VALIDADE_TOKEN)).timestamp(),
    };

    let token = match encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(data.jwt_secret.as_ref()),
    ) {
        Ok(t) => t,
        Err(e) => return erro_interno("Erro ao gerar token de autenticação", e),
    };

    HttpResponse::Ok().json(AuthResponse {
        status: "success".to_string(),
        message: "Login bem-sucedido!".to_string(),
        user_id: usuario.id,
        user_name: usuario.nome,
        user_email: usuario.email,
        token,
    })
}

/// Lista os usuários administradores do painel.
#[get("/admin/usuarios")]
pub async fn listar_usuarios_admin(data: web::Data<AppState>, _admin: Admin) -> HttpResponse {
    let resultado = query_as::<_, UsuarioAdmin>(
        "SELECT id, usuario_id, email, papel, ativo, criado_em \
         FROM usuarios_admin ORDER BY criado_em DESC",
    )
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(admins) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Usuários administradores listados com sucesso!",
            admins,
        )),
        Err(e) => erro_interno("Erro ao listar usuários administradores", e),
    }
}

/// Cria um usuário administrador: credenciais em `usuarios` (se ainda não
/// existirem) e o papel em `usuarios_admin`.
#[post("/admin/usuarios")]
pub async fn cadastrar_usuario_admin(
    data: web::Data<AppState>,
    _admin: Admin,
    novo: web::Json<NovoUsuarioAdmin>,
) -> HttpResponse {
    let senha_hash = match hash(&novo.senha, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => return erro_interno("Erro ao processar senha", e),
    };

    let mut tx = match data.db_pool.begin().await {
        Ok(tx) => tx,
        Err(e) => return erro_interno("Erro ao iniciar transação", e),
    };

    // Reaproveita credenciais já cadastradas com o mesmo e-mail.
    let usuario_id = match sqlx::query_scalar::<_, i32>(
        "SELECT id FROM usuarios WHERE email = $1",
    )
    .bind(&novo.email)
    .fetch_optional(&mut tx)
    .await
    {
        Ok(Some(id)) => id,
        Ok(None) => {
            match sqlx::query_scalar::<_, i32>(
                "INSERT INTO usuarios (nome, email, senha_hash) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(&novo.nome)
            .bind(&novo.email)
            .bind(&senha_hash)
            .fetch_one(&mut tx)
            .await
            {
                Ok(id) => id,
                Err(e) => return erro_interno("Erro ao inserir credenciais do administrador", e),
            }
        }
        Err(e) => return erro_interno("Erro ao verificar credenciais existentes", e),
    };

    let inserido = sqlx::query_scalar::<_, i32>(
        "INSERT INTO usuarios_admin (usuario_id, email, papel) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(usuario_id)
    .bind(&novo.email)
    .bind(&novo.papel)
    .fetch_one(&mut tx)
    .await;

    let admin_id = match inserido {
        Ok(id) => id,
        Err(e) => return erro_interno("Erro ao registrar administrador", e),
    };

    if let Err(e) = tx.commit().await {
        return erro_interno("Erro ao concluir cadastro de administrador", e);
    }

    HttpResponse::Ok().json(GenericResponse::com_corpo(
        "Administrador cadastrado com sucesso!",
        serde_json::json!({ "id": admin_id, "usuario_id": usuario_id }),
    ))
}

/// Ativa/desativa um administrador. A mudança só tem efeito pleno quando a
/// entrada correspondente do cache de checagem expirar (TTL de 5 minutos).
#[patch("/admin/usuarios/{id}/ativo")]
pub async fn atualizar_ativo_usuario_admin(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    corpo: web::Json<AtualizarAtivo>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("UPDATE usuarios_admin SET ativo = $1 WHERE id = $2")
        .bind(corpo.ativo)
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Administrador atualizado."))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Administrador com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar administrador", e),
    }
}

/// Remove um administrador do painel (as credenciais em `usuarios` permanecem).
#[delete("/admin/usuarios/{id}")]
pub async fn deletar_usuario_admin(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("DELETE FROM usuarios_admin WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Administrador removido."))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Administrador com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao remover administrador", e),
    }
}
