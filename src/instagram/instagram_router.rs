// src/instagram/instagram_router.rs

use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::query_as;

use super::instagram_structs::{LinkInstagram, NovoLinkInstagram};
use crate::shared::shared_structs::{erro_interno, AtualizarAtivo, GenericResponse};
use crate::usuarios::auth_middleware::Admin;
use crate::AppState;

/// Rota pública: publicações ativas do feed.
#[get("/instagram")]
pub async fn buscar_links_instagram(data: web::Data<AppState>) -> impl Responder {
    let resultado = query_as::<_, LinkInstagram>(
        "SELECT id, url, imagem_url, ativo, criado_em \
         FROM link_instagram WHERE ativo = TRUE ORDER BY criado_em DESC",
    )
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(links) => {
            HttpResponse::Ok().json(GenericResponse::com_corpo("Feed do Instagram", links))
        }
        Err(e) => erro_interno("Erro ao buscar links do Instagram", e),
    }
}

#[get("/admin/instagram")]
pub async fn listar_links_instagram_admin(
    data: web::Data<AppState>,
    _admin: Admin,
) -> impl Responder {
    let resultado = query_as::<_, LinkInstagram>(
        "SELECT id, url, imagem_url, ativo, criado_em \
         FROM link_instagram ORDER BY criado_em DESC",
    )
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(links) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Links listados com sucesso!",
            links,
        )),
        Err(e) => erro_interno("Erro ao listar links do Instagram", e),
    }
}

#[post("/admin/instagram")]
pub async fn cadastrar_link_instagram(
    data: web::Data<AppState>,
    _admin: Admin,
    item: web::Json<NovoLinkInstagram>,
) -> HttpResponse {
    let resultado = sqlx::query_scalar::<_, i32>(
        "INSERT INTO link_instagram (url, imagem_url) VALUES ($1, $2) RETURNING id",
    )
    .bind(&item.url)
    .bind(&item.imagem_url)
    .fetch_one(&data.db_pool)
    .await;

    match resultado {
        Ok(id) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Link cadastrado com sucesso!",
            serde_json::json!({ "id": id }),
        )),
        Err(e) => erro_interno("Erro ao inserir link do Instagram", e),
    }
}

#[patch("/admin/instagram/{id}/ativo")]
pub async fn atualizar_ativo_link_instagram(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    corpo: web::Json<AtualizarAtivo>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("UPDATE link_instagram SET ativo = $1 WHERE id = $2")
        .bind(corpo.ativo)
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Link atualizado."))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Link com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar link do Instagram", e),
    }
}

#[delete("/admin/instagram/{id}")]
pub async fn deletar_link_instagram(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("DELETE FROM link_instagram WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Link excluído com sucesso!"))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Link com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao excluir link do Instagram", e),
    }
}
