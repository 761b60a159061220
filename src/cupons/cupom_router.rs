// src/cupons/cupom_router.rs

use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use chrono::Utc;
use sqlx::query_as;

use super::cupom_structs::{validar_cupom, Cupom, NovoCupom};
use crate::shared::shared_structs::{erro_interno, AtualizarAtivo, GenericResponse};
use crate::usuarios::auth_middleware::Admin;
use crate::AppState;

/// Rota pública usada pela loja para conferir um cupom antes do checkout.
#[get("/cupons/validar/{codigo}")]
pub async fn validar_cupom_por_codigo(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let codigo = path.into_inner();

    let cupom = match query_as::<_, Cupom>(
        "SELECT id, codigo, tipo, valor, validade, ativo, criado_em \
         FROM cupons WHERE UPPER(codigo) = UPPER($1)",
    )
    .bind(&codigo)
    .fetch_optional(&data.db_pool)
    .await
    {
        Ok(Some(c)) => c,
        Ok(None) => {
            return HttpResponse::NotFound().json(GenericResponse::erro(format!(
                "Cupom {} não encontrado.",
                codigo
            )));
        }
        Err(e) => return erro_interno("Erro ao buscar cupom", e),
    };

    match validar_cupom(&cupom, Utc::now()) {
        Ok(_) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Cupom válido.",
            serde_json::json!({
                "codigo": cupom.codigo,
                "tipo": cupom.tipo,
                "valor": cupom.valor,
            }),
        )),
        Err(recusa) => {
            HttpResponse::BadRequest().json(GenericResponse::erro(recusa.mensagem()))
        }
    }
}

#[get("/admin/cupons")]
pub async fn listar_cupons(data: web::Data<AppState>, _admin: Admin) -> impl Responder {
    let resultado = query_as::<_, Cupom>(
        "SELECT id, codigo, tipo, valor, validade, ativo, criado_em \
         FROM cupons ORDER BY criado_em DESC",
    )
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(cupons) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Cupons listados com sucesso!",
            cupons,
        )),
        Err(e) => erro_interno("Erro ao listar cupons", e),
    }
}

#[post("/admin/cupons")]
pub async fn cadastrar_cupom(
    data: web::Data<AppState>,
    _admin: Admin,
    item: web::Json<NovoCupom>,
) -> HttpResponse {
    let resultado = sqlx::query_scalar::<_, i32>(
        "INSERT INTO cupons (codigo, tipo, valor, validade) \
         VALUES (UPPER($1), $2, $3, $4) RETURNING id",
    )
    .bind(&item.codigo)
    .bind(item.tipo.as_str())
    .bind(&item.valor)
    .bind(item.validade)
    .fetch_one(&data.db_pool)
    .await;

    match resultado {
        Ok(id) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Cupom cadastrado com sucesso!",
            serde_json::json!({ "id": id }),
        )),
        Err(e) => {
            // Código é único; colisão vira erro de negócio, não 500.
            if e.to_string().contains("cupons_codigo_key") {
                HttpResponse::BadRequest()
                    .json(GenericResponse::erro("Já existe um cupom com esse código."))
            } else {
                erro_interno("Erro ao inserir cupom", e)
            }
        }
    }
}

#[put("/admin/cupons/{id}")]
pub async fn atualizar_cupom(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    item: web::Json<NovoCupom>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query(
        "UPDATE cupons SET codigo = UPPER($1), tipo = $2, valor = $3, validade = $4 WHERE id = $5",
    )
    .bind(&item.codigo)
    .bind(item.tipo.as_str())
    .bind(&item.valor)
    .bind(item.validade)
    .bind(id)
    .execute(&data.db_pool)
    .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Cupom atualizado com sucesso!"))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Cupom com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar cupom", e),
    }
}

#[patch("/admin/cupons/{id}/ativo")]
pub async fn atualizar_ativo_cupom(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    corpo: web::Json<AtualizarAtivo>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("UPDATE cupons SET ativo = $1 WHERE id = $2")
        .bind(corpo.ativo)
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Cupom atualizado."))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Cupom com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar cupom", e),
    }
}

#[delete("/admin/cupons/{id}")]
pub async fn deletar_cupom(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado = sqlx::query("DELETE FROM cupons WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Cupom excluído com sucesso!"))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Cupom com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao excluir cupom", e),
    }
}
