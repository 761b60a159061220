// src/pedidos/pedido_router.rs

use actix_web::{get, patch, post, web, HttpResponse, Responder};
use sqlx::query_as;

use super::checkout::{processar_checkout, ErroCheckout};
use super::pedido_structs::{
    movimentos_de_reposicao, status_aplicavel, AtualizarStatus, CheckoutRequest, ItemPedido,
    Pedido, PedidoComCliente, STATUS_CANCELADO,
};
use crate::sacola::sacola_structs::SacolaStore;
use crate::shared::shared_structs::{erro_interno, GenericResponse};
use crate::usuarios::auth_middleware::{Admin, UsuarioAutenticado};
use crate::AppState;

const COLUNAS_PEDIDO: &str = "id, numero_pedido, cliente_id, endereco_entrega, subtotal, \
     desconto, frete, total, status, forma_pagamento, chave_idempotencia, \
     criado_em, atualizado_em";

/// Finaliza a compra da sacola do usuário autenticado.
#[post("/checkout")]
pub async fn finalizar_compra(
    data: web::Data<AppState>,
    sacola: web::Data<SacolaStore>,
    usuario: UsuarioAutenticado,
    requisicao: web::Json<CheckoutRequest>,
) -> HttpResponse {
    match processar_checkout(&data, &sacola, &usuario, &requisicao).await {
        Ok(resposta) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Compra realizada com sucesso!",
            resposta,
        )),
        Err(erro @ ErroCheckout::SacolaVazia)
        | Err(erro @ ErroCheckout::ProdutoIndisponivel(_))
        | Err(erro @ ErroCheckout::CupomRecusado(_)) => {
            HttpResponse::BadRequest().json(GenericResponse::erro(erro.to_string()))
        }
        Err(erro @ ErroCheckout::EstoqueInsuficiente { .. }) => {
            HttpResponse::Conflict().json(GenericResponse::erro(erro.to_string()))
        }
        Err(erro) => erro_interno("Erro ao processar checkout", erro),
    }
}

/// Pedidos do próprio cliente, mais recentes primeiro.
#[get("/meus-pedidos")]
pub async fn listar_meus_pedidos(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
) -> impl Responder {
    let sql = format!(
        "SELECT {} FROM pedidos \
         WHERE cliente_id = (SELECT id FROM clientes WHERE usuario_id = $1) \
         ORDER BY criado_em DESC",
        COLUNAS_PEDIDO
    );

    let resultado = query_as::<_, Pedido>(&sql)
        .bind(usuario.usuario_id)
        .fetch_all(&data.db_pool)
        .await;

    match resultado {
        Ok(pedidos) => {
            HttpResponse::Ok().json(GenericResponse::com_corpo("Seus pedidos", pedidos))
        }
        Err(e) => erro_interno("Erro ao listar pedidos do cliente", e),
    }
}

/// Painel: todos os pedidos com o nome do cliente.
#[get("/admin/pedidos")]
pub async fn listar_pedidos_admin(data: web::Data<AppState>, _admin: Admin) -> impl Responder {
    let resultado = query_as::<_, PedidoComCliente>(
        "SELECT p.id, p.numero_pedido, p.cliente_id, c.nome AS cliente_nome, \
                p.subtotal, p.desconto, p.frete, p.total, p.status, p.forma_pagamento, \
                p.criado_em \
         FROM pedidos p \
         JOIN clientes c ON c.id = p.cliente_id \
         ORDER BY p.criado_em DESC",
    )
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(pedidos) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Pedidos listados com sucesso!",
            pedidos,
        )),
        Err(e) => erro_interno("Erro ao listar pedidos", e),
    }
}

/// Painel: um pedido com seus itens.
#[get("/admin/pedidos/{id}")]
pub async fn buscar_pedido_admin(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();

    let sql = format!("SELECT {} FROM pedidos WHERE id = $1", COLUNAS_PEDIDO);
    let pedido = match query_as::<_, Pedido>(&sql)
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await
    {
        Ok(Some(p)) => p,
        Ok(None) => {
            return HttpResponse::NotFound().json(GenericResponse::erro(format!(
                "Pedido com ID {} não encontrado.",
                id
            )));
        }
        Err(e) => return erro_interno("Erro ao buscar pedido", e),
    };

    let itens = match query_as::<_, ItemPedido>(
        "SELECT id, pedido_id, produto_id, nome, quantidade, preco_unitario, subtotal, \
                tamanho, cor, material, imagem \
         FROM itens_pedido WHERE pedido_id = $1 ORDER BY id",
    )
    .bind(id)
    .fetch_all(&data.db_pool)
    .await
    {
        Ok(itens) => itens,
        Err(e) => return erro_interno("Erro ao buscar itens do pedido", e),
    };

    HttpResponse::Ok().json(GenericResponse::com_corpo(
        "Pedido encontrado.",
        serde_json::json!({ "pedido": pedido, "itens": itens }),
    ))
}

/// Painel: muda o status de um pedido (pago, enviado, entregue...).
/// Cancelamento não passa por aqui: tem rota própria, com reposição de
/// estoque.
#[patch("/admin/pedidos/{id}/status")]
pub async fn atualizar_status_pedido(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    corpo: web::Json<AtualizarStatus>,
) -> HttpResponse {
    let id = path.into_inner();

    if !status_aplicavel(&corpo.status) {
        return HttpResponse::BadRequest().json(GenericResponse::erro(format!(
            "Status {} não pode ser aplicado por esta rota.",
            corpo.status
        )));
    }

    let resultado = sqlx::query(
        "UPDATE pedidos SET status = $1, atualizado_em = NOW() \
         WHERE id = $2 AND status <> $3",
    )
    .bind(&corpo.status)
    .bind(id)
    .bind(STATUS_CANCELADO)
    .execute(&data.db_pool)
    .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Status do pedido atualizado."))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Pedido com ID {} não encontrado ou já cancelado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar status do pedido", e),
    }
}

/// Cancela um pedido e repõe o estoque dos itens, tudo na mesma transação:
/// o status muda para cancelado e cada item gera uma movimentação de
/// entrada espelhando a quantidade vendida.
#[post("/admin/pedidos/{id}/cancelar")]
pub async fn cancelar_pedido(
    data: web::Data<AppState>,
    admin: Admin,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();

    let mut tx = match data.db_pool.begin().await {
        Ok(tx) => tx,
        Err(e) => return erro_interno("Erro ao iniciar transação de cancelamento", e),
    };

    let sql = format!("SELECT {} FROM pedidos WHERE id = $1 FOR UPDATE", COLUNAS_PEDIDO);
    let pedido = match query_as::<_, Pedido>(&sql).bind(id).fetch_optional(&mut tx).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            return HttpResponse::NotFound().json(GenericResponse::erro(format!(
                "Pedido com ID {} não encontrado.",
                id
            )));
        }
        Err(e) => return erro_interno("Erro ao buscar pedido para cancelamento", e),
    };

    if pedido.status == STATUS_CANCELADO {
        return HttpResponse::Conflict().json(GenericResponse::erro(format!(
            "Pedido {} já está cancelado.",
            pedido.numero_pedido
        )));
    }

    if let Err(e) = sqlx::query(
        "UPDATE pedidos SET status = $1, atualizado_em = NOW() WHERE id = $2",
    )
    .bind(STATUS_CANCELADO)
    .bind(id)
    .execute(&mut tx)
    .await
    {
        return erro_interno("Erro ao atualizar status do pedido", e);
    }

    let itens = match query_as::<_, ItemPedido>(
        "SELECT id, pedido_id, produto_id, nome, quantidade, preco_unitario, subtotal, \
                tamanho, cor, material, imagem \
         FROM itens_pedido WHERE pedido_id = $1",
    )
    .bind(id)
    .fetch_all(&mut tx)
    .await
    {
        Ok(itens) => itens,
        Err(e) => return erro_interno("Erro ao buscar itens para reposição", e),
    };

    for reposicao in movimentos_de_reposicao(&itens, &pedido.numero_pedido) {
        if let Err(e) = sqlx::query(
            "INSERT INTO movimentacoes_estoque \
             (produto_id, tipo, quantidade, valor_unitario, valor_total, observacao, usuario) \
             VALUES ($1, 'entrada', $2, $3, $4, $5, $6)",
        )
        .bind(reposicao.produto_id)
        .bind(reposicao.quantidade)
        .bind(&reposicao.valor_unitario)
        .bind(&reposicao.valor_total)
        .bind(&reposicao.observacao)
        .bind(&admin.0.nome)
        .execute(&mut tx)
        .await
        {
            return erro_interno("Erro ao repor estoque do pedido", e);
        }
    }

    if let Err(e) = tx.commit().await {
        return erro_interno("Erro ao concluir cancelamento", e);
    }

    tracing::info!(
        "Pedido {} cancelado por {}; {} item(ns) repostos no estoque",
        pedido.numero_pedido,
        admin.0.nome,
        itens.len()
    );

    HttpResponse::Ok().json(GenericResponse::com_corpo(
        format!("Pedido {} cancelado com sucesso!", pedido.numero_pedido),
        serde_json::json!({ "itens_repostos": itens.len() }),
    ))
}
