// src/bin/cancelar_pedido.rs
//
// Utilitário de manutenção: cancela um pedido pelo número e repõe o estoque
// dos itens. Uso:
//
//     cancelar_pedido PED-0042
//
// Lê DATABASE_URL do ambiente (ou de um arquivo .env).

use bigdecimal::BigDecimal;
use sqlx::{Pool, Postgres};

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    let numero_pedido = match std::env::args().nth(1) {
        Some(n) => n,
        None => {
            eprintln!("Uso: cancelar_pedido <numero do pedido>");
            std::process::exit(1);
        }
    };

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL precisa estar definida");

    let pool = Pool::<Postgres>::connect(&database_url)
        .await
        .expect("Falha ao conectar ao banco PostgreSQL");

    if let Err(e) = cancelar(&pool, &numero_pedido).await {
        eprintln!("Erro ao cancelar o pedido {}: {}", numero_pedido, e);
        std::process::exit(1);
    }
}

async fn cancelar(pool: &Pool<Postgres>, numero_pedido: &str) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let pedido = sqlx::query_as::<_, (i32, String)>(
        "SELECT id, status FROM pedidos WHERE numero_pedido = $1 FOR UPDATE",
    )
    .bind(numero_pedido)
    .fetch_optional(&mut tx)
    .await?;

    let Some((pedido_id, status)) = pedido else {
        eprintln!("Pedido {} não encontrado.", numero_pedido);
        std::process::exit(1);
    };

    if status == "cancelado" {
        println!("Pedido {} já está cancelado; nada a fazer.", numero_pedido);
        return Ok(());
    }

    sqlx::query("UPDATE pedidos SET status = 'cancelado', atualizado_em = NOW() WHERE id = $1")
        .bind(pedido_id)
        .execute(&mut tx)
        .await?;

    let itens = sqlx::query_as::<_, (i32, i32, BigDecimal, BigDecimal)>(
        "SELECT produto_id, quantidade, preco_unitario, subtotal \
         FROM itens_pedido WHERE pedido_id = $1",
    )
    .bind(pedido_id)
    .fetch_all(&mut tx)
    .await?;

    for (produto_id, quantidade, preco_unitario, subtotal) in &itens {
        sqlx::query(
            "INSERT INTO movimentacoes_estoque \
             (produto_id, tipo, quantidade, valor_unitario, valor_total, observacao, usuario) \
             VALUES ($1, 'entrada', $2, $3, $4, $5, 'script de manutenção')",
        )
        .bind(produto_id)
        .bind(quantidade)
        .bind(preco_unitario)
        .bind(subtotal)
        .bind(format!("Cancelamento do pedido {}", numero_pedido))
        .execute(&mut tx)
        .await?;
    }

    tx.commit().await?;

    println!(
        "Pedido {} cancelado; {} item(ns) repostos no estoque.",
        numero_pedido,
        itens.len()
    );

    Ok(())
}
