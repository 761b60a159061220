// src/categorias/categoria_router.rs

use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::query_as;

use super::categoria_structs::{Categoria, NovaCategoria};
use crate::shared::shared_structs::{erro_interno, AtualizarAtivo, GenericResponse};
use crate::usuarios::auth_middleware::Admin;
use crate::AppState;

/// Rota pública: lista as categorias ativas da vitrine.
#[get("/categorias")]
pub async fn buscar_categorias(data: web::Data<AppState>) -> impl Responder {
    let resultado = query_as::<_, Categoria>(
        "SELECT id, nome, descricao, ativo, criado_em FROM categorias \
         WHERE ativo = TRUE ORDER BY nome",
    )
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(categorias) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Categorias listadas com sucesso!",
            categorias,
        )),
        Err(e) => erro_interno("Erro ao buscar categorias", e),
    }
}

/// Painel: lista todas as categorias, inclusive inativas.
#[get("/admin/categorias")]
pub async fn listar_categorias_admin(data: web::Data<AppState>, _admin: Admin) -> impl Responder {
    let resultado = query_as::<_, Categoria>(
        "SELECT id, nome, descricao, ativo, criado_em FROM categorias ORDER BY criado_em DESC",
    )
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(categorias) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Categorias listadas com sucesso!",
            categorias,
        )),
        Err(e) => erro_interno("Erro ao listar categorias", e),
    }
}

/// Rota para cadastrar uma nova categoria.
#[post("/admin/categorias")]
pub async fn cadastrar_categoria(
    data: web::Data<AppState>,
    _admin: Admin,
    item: web::Json<NovaCategoria>,
) -> HttpResponse {
    let resultado = sqlx::query_scalar::<_, i32>(
        "INSERT INTO categorias (nome, descricao) VALUES ($1, $2) RETURNING id",
    )
    .bind(&item.nome)
    .bind(&item.descricao)
    .fetch_one(&data.db_pool)
    .await;

    match resultado {
        Ok(id) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            format!("Categoria cadastrada com sucesso! ID: {}", id),
            serde_json::json!({ "id": id }),
        )),
        Err(e) => erro_interno("Erro ao inserir categoria", e),
    }
}

/// Atualiza nome e descrição de uma categoria.
#[put("/admin/categorias/{id}")]
pub async fn atualizar_categoria(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    item: web::Json<NovaCategoria>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("UPDATE categorias SET nome = $1, descricao = $2 WHERE id = $3")
        .bind(&item.nome)
        .bind(&item.descricao)
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Categoria atualizada com sucesso!"))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Categoria com ID {} não encontrada.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar categoria", e),
    }
}

#[patch("/admin/categorias/{id}/ativo")]
pub async fn atualizar_ativo_categoria(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    corpo: web::Json<AtualizarAtivo>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("UPDATE categorias SET ativo = $1 WHERE id = $2")
        .bind(corpo.ativo)
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Categoria atualizada."))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Categoria com ID {} não encontrada.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar categoria", e),
    }
}

/// Exclui uma categoria. Os produtos vinculados ficam sem categoria
/// (ON DELETE SET NULL no esquema).
#[delete("/admin/categorias/{id}")]
pub async fn deletar_categoria(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("DELETE FROM categorias WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Categoria excluída com sucesso!"))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Categoria com ID {} não encontrada.",
            id
        ))),
        Err(e) => erro_interno("Erro ao excluir categoria", e),
    }
}
