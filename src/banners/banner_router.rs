// src/banners/banner_router.rs

use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::query_as;

use super::banner_structs::{Banner, NovoBanner};
use crate::shared::shared_structs::{erro_interno, AtualizarAtivo, GenericResponse};
use crate::usuarios::auth_middleware::Admin;
use crate::AppState;

/// Rota pública: banners ativos, na ordem de criação.
#[get("/banners")]
pub async fn buscar_banners(data: web::Data<AppState>) -> impl Responder {
    let resultado = query_as::<_, Banner>(
        "SELECT id, titulo, imagem_url, link, ativo, criado_em \
         FROM banners WHERE ativo = TRUE ORDER BY criado_em DESC",
    )
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(banners) => {
            HttpResponse::Ok().json(GenericResponse::com_corpo("Banners da loja", banners))
        }
        Err(e) => erro_interno("Erro ao buscar banners", e),
    }
}

#[get("/admin/banners")]
pub async fn listar_banners_admin(data: web::Data<AppState>, _admin: Admin) -> impl Responder {
    let resultado = query_as::<_, Banner>(
        "SELECT id, titulo, imagem_url, link, ativo, criado_em \
         FROM banners ORDER BY criado_em DESC",
    )
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(banners) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Banners listados com sucesso!",
            banners,
        )),
        Err(e) => erro_interno("Erro ao listar banners", e),
    }
}

#[post("/admin/banners")]
pub async fn cadastrar_banner(
    data: web::Data<AppState>,
    _admin: Admin,
    item: web::Json<NovoBanner>,
) -> HttpResponse {
    let resultado = sqlx::query_scalar::<_, i32>(
        "INSERT INTO banners (titulo, imagem_url, link) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&item.titulo)
    .bind(&item.imagem_url)
    .bind(&item.link)
    .fetch_one(&data.db_pool)
    .await;

    match resultado {
        Ok(id) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Banner cadastrado com sucesso!",
            serde_json::json!({ "id": id }),
        )),
        Err(e) => erro_interno("Erro ao inserir banner", e),
    }
}

#[put("/admin/banners/{id}")]
pub async fn atualizar_banner(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    item: web::Json<NovoBanner>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado =
        sqlx::query("UPDATE banners SET titulo = $1, imagem_url = $2, link = $3 WHERE id = $4")
            .bind(&item.titulo)
            .bind(&item.imagem_url)
            .bind(&item.link)
            .bind(id)
            .execute(&data.db_pool)
            .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Banner atualizado com sucesso!"))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Banner com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar banner", e),
    }
}

#[patch("/admin/banners/{id}/ativo")]
pub async fn atualizar_ativo_banner(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    corpo: web::Json<AtualizarAtivo>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("UPDATE banners SET ativo = $1 WHERE id = $2")
        .bind(corpo.ativo)
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Banner atualizado."))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Banner com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar banner", e),
    }
}

#[delete("/admin/banners/{id}")]
pub async fn deletar_banner(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("DELETE FROM banners WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Banner excluído com sucesso!"))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Banner com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao excluir banner", e),
    }
}
