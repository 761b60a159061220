// src/estoque/estoque_router.rs

use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::query_as;

use super::estoque_structs::{
    saldo_estoque, FiltroMovimentacoes, Movimentacao, NovaMovimentacao,
};
use crate::shared::shared_structs::{erro_interno, GenericResponse};
use crate::usuarios::auth_middleware::Admin;
use crate::AppState;

/// Painel: histórico de movimentações, opcionalmente filtrado por produto.
#[get("/admin/estoque")]
pub async fn listar_movimentacoes(
    data: web::Data<AppState>,
    _admin: Admin,
    filtro: web::Query<FiltroMovimentacoes>,
) -> impl Responder {
    let resultado = query_as::<_, Movimentacao>(
        "SELECT id, produto_id, tipo, quantidade, valor_unitario, valor_total, \
                fornecedor, observacao, usuario, criado_em \
         FROM movimentacoes_estoque \
         WHERE $1::INTEGER IS NULL OR produto_id = $1 \
         ORDER BY criado_em DESC",
    )
    .bind(filtro.produto_id)
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(movimentacoes) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Movimentações listadas com sucesso!",
            movimentacoes,
        )),
        Err(e) => erro_interno("Erro ao listar movimentações de estoque", e),
    }
}

/// Registra uma movimentação manual. O razão só recebe inserções; correções
/// entram como movimentação de ajuste, nunca como edição do histórico.
#[post("/admin/estoque")]
pub async fn registrar_movimentacao(
    data: web::Data<AppState>,
    admin: Admin,
    corpo: web::Json<NovaMovimentacao>,
) -> HttpResponse {
    if corpo.quantidade == 0 {
        return HttpResponse::BadRequest()
            .json(GenericResponse::erro("A quantidade não pode ser zero."));
    }

    let existe = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM produtos WHERE id = $1)")
        .bind(corpo.produto_id)
        .fetch_one(&data.db_pool)
        .await;

    match existe {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::BadRequest().json(GenericResponse::erro(format!(
                "Produto com ID {} não encontrado.",
                corpo.produto_id
            )));
        }
        Err(e) => return erro_interno("Erro ao verificar produto", e),
    }

    let valor_total = corpo
        .valor_unitario
        .as_ref()
        .map(|v| v * bigdecimal::BigDecimal::from(corpo.quantidade));

    let resultado = sqlx::query_scalar::<_, i32>(
        "INSERT INTO movimentacoes_estoque \
         (produto_id, tipo, quantidade, valor_unitario, valor_total, fornecedor, observacao, usuario) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(corpo.produto_id)
    .bind(corpo.tipo.as_str())
    .bind(corpo.quantidade)
    .bind(&corpo.valor_unitario)
    .bind(&valor_total)
    .bind(&corpo.fornecedor)
    .bind(&corpo.observacao)
    .bind(&admin.0.nome)
    .fetch_one(&data.db_pool)
    .await;

    match resultado {
        Ok(id) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Movimentação registrada com sucesso!",
            serde_json::json!({ "id": id }),
        )),
        Err(e) => erro_interno("Erro ao registrar movimentação", e),
    }
}

/// Saldo atual de um produto, derivado do razão.
#[get("/admin/estoque/{produto_id}/saldo")]
pub async fn consultar_saldo(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
) -> HttpResponse {
    let produto_id = path.into_inner();

    match saldo_estoque(&data.db_pool, produto_id).await {
        Ok(saldo) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Saldo do produto",
            serde_json::json!({ "produto_id": produto_id, "saldo": saldo }),
        )),
        Err(e) => erro_interno("Erro ao calcular saldo de estoque", e),
    }
}
