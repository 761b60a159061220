// src/fornecedores/fornecedor_router.rs

use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::query_as;

use super::fornecedor_structs::{Fornecedor, NovoFornecedor};
use crate::shared::shared_structs::{erro_interno, AtualizarAtivo, GenericResponse};
use crate::usuarios::auth_middleware::Admin;
use crate::AppState;

#[get("/admin/fornecedores")]
pub async fn listar_fornecedores(data: web::Data<AppState>, _admin: Admin) -> impl Responder {
    let resultado = query_as::<_, Fornecedor>(
        "SELECT id, nome, cnpj, telefone, email, ativo, criado_em \
         FROM fornecedores ORDER BY criado_em DESC",
    )
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(fornecedores) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Fornecedores listados com sucesso!",
            fornecedores,
        )),
        Err(e) => erro_interno("Erro ao listar fornecedores", e),
    }
}

#[post("/admin/fornecedores")]
pub async fn cadastrar_fornecedor(
    data: web::Data<AppState>,
    _admin: Admin,
    item: web::Json<NovoFornecedor>,
) -> HttpResponse {
    let resultado = sqlx::query_scalar::<_, i32>(
        "INSERT INTO fornecedores (nome, cnpj, telefone, email) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&item.nome)
    .bind(&item.cnpj)
    .bind(&item.telefone)
    .bind(&item.email)
    .fetch_one(&data.db_pool)
    .await;

    match resultado {
        Ok(id) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Fornecedor cadastrado com sucesso!",
            serde_json::json!({ "id": id }),
        )),
        Err(e) => erro_interno("Erro ao inserir fornecedor", e),
    }
}

#[put("/admin/fornecedores/{id}")]
pub async fn atualizar_fornecedor(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    item: web::Json<NovoFornecedor>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query(
        "UPDATE fornecedores SET nome = $1, cnpj = $2, telefone = $3, email = $4 WHERE id = $5",
    )
    .bind(&item.nome)
    .bind(&item.cnpj)
    .bind(&item.telefone)
    .bind(&item.email)
    .bind(id)
    .execute(&data.db_pool)
    .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Fornecedor atualizado com sucesso!"))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Fornecedor com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar fornecedor", e),
    }
}

#[patch("/admin/fornecedores/{id}/ativo")]
pub async fn atualizar_ativo_fornecedor(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    corpo: web::Json<AtualizarAtivo>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("UPDATE fornecedores SET ativo = $1 WHERE id = $2")
        .bind(corpo.ativo)
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Fornecedor atualizado."))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Fornecedor com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar fornecedor", e),
    }
}

#[delete("/admin/fornecedores/{id}")]
pub async fn deletar_fornecedor(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("DELETE FROM fornecedores WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Fornecedor excluído com sucesso!"))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Fornecedor com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao excluir fornecedor", e),
    }
}
