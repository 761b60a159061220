// src/clientes/cliente_router.rs

use actix_web::{get, patch, put, web, HttpResponse, Responder};
use sqlx::query_as;

use super::cliente_structs::{AtualizarPerfil, Cliente, FiltroClientes};
use crate::shared::shared_structs::{erro_interno, AtualizarAtivo, GenericResponse};
use crate::usuarios::auth_middleware::{Admin, UsuarioAutenticado};
use crate::AppState;

/// Painel: lista clientes, com busca opcional por nome ou e-mail.
#[get("/admin/clientes")]
pub async fn listar_clientes(
    data: web::Data<AppState>,
    _admin: Admin,
    filtro: web::Query<FiltroClientes>,
) -> impl Responder {
    let resultado = query_as::<_, Cliente>(
        "SELECT id, usuario_id, nome, email, telefone, cpf, ativo, criado_em \
         FROM clientes \
         WHERE $1::TEXT IS NULL OR nome ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%' \
         ORDER BY criado_em DESC",
    )
    .bind(&filtro.busca)
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(clientes) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Clientes listados com sucesso!",
            clientes,
        )),
        Err(e) => erro_interno("Erro ao listar clientes", e),
    }
}

#[patch("/admin/clientes/{id}/ativo")]
pub async fn atualizar_ativo_cliente(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    corpo: web::Json<AtualizarAtivo>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("UPDATE clientes SET ativo = $1 WHERE id = $2")
        .bind(corpo.ativo)
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Cliente atualizado."))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Cliente com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar cliente", e),
    }
}

/// Perfil do próprio cliente (página "minha conta").
#[get("/perfil")]
pub async fn buscar_perfil(data: web::Data<AppState>, usuario: UsuarioAutenticado) -> HttpResponse {
    let resultado = query_as::<_, Cliente>(
        "SELECT id, usuario_id, nome, email, telefone, cpf, ativo, criado_em \
         FROM clientes WHERE usuario_id = $1",
    )
    .bind(usuario.usuario_id)
    .fetch_optional(&data.db_pool)
    .await;

    match resultado {
        Ok(Some(cliente)) => {
            HttpResponse::Ok().json(GenericResponse::com_corpo("Perfil do cliente", cliente))
        }
        Ok(None) => HttpResponse::NotFound().json(GenericResponse::erro(
            "Perfil de cliente ainda não criado. Ele será criado na primeira compra.",
        )),
        Err(e) => erro_interno("Erro ao buscar perfil", e),
    }
}

#[put("/perfil")]
pub async fn atualizar_perfil(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    corpo: web::Json<AtualizarPerfil>,
) -> HttpResponse {
    let resultado = sqlx::query(
        "UPDATE clientes SET nome = $1, telefone = $2, cpf = $3 WHERE usuario_id = $4",
    )
    .bind(&corpo.nome)
    .bind(&corpo.telefone)
    .bind(&corpo.cpf)
    .bind(usuario.usuario_id)
    .execute(&data.db_pool)
    .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Perfil atualizado com sucesso!"))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(
            "Perfil de cliente não encontrado.",
        )),
        Err(e) => erro_interno("Erro ao atualizar perfil", e),
    }
}
