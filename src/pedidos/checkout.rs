// src/pedidos/checkout.rs
//
// Orquestração do checkout: uma única operação, dentro de uma transação,
// para qualquer forma de pagamento. A sacola vira pedido + itens + baixas
// de estoque; só depois do commit a sacola é esvaziada e o efeito de
// pagamento (preferência ou webhook) é disparado.

use bigdecimal::BigDecimal;
use chrono::Utc;
use rand::Rng;
use sqlx::{query_as, Postgres, Transaction};
use thiserror::Error;

use super::pedido_structs::{
    CheckoutRequest, CheckoutResponse, FormaPagamento, ItemPedido, Pedido, STATUS_PENDENTE,
};
use crate::cupons::cupom_structs::{calcular_desconto, validar_cupom, Cupom};
use crate::enderecos::endereco_router::resolver_endereco;
use crate::estoque::estoque_structs::saldo_estoque;
use crate::pagamentos::pagamentos_client::ErroPagamento;
use crate::sacola::sacola_structs::{ItemSacola, SacolaStore};
use crate::usuarios::auth_middleware::UsuarioAutenticado;
use crate::AppState;

/// Tentativas de sorteio do sufixo antes de desistir.
const MAX_TENTATIVAS_NUMERO: u32 = 20;

#[derive(Debug, Error)]
pub enum ErroCheckout {
    #[error("A sacola está vazia. Adicione itens antes de finalizar a compra.")]
    SacolaVazia,
    #[error("Produto {0} não está mais disponível.")]
    ProdutoIndisponivel(String),
    #[error("Estoque insuficiente para {produto}. Disponível: {disponivel}, solicitado: {solicitado}.")]
    EstoqueInsuficiente {
        produto: String,
        disponivel: i64,
        solicitado: i32,
    },
    #[error("{0}")]
    CupomRecusado(String),
    #[error("Não foi possível gerar um número de pedido livre.")]
    NumerosEsgotados,
    #[error("erro de banco no checkout: {0}")]
    Banco(#[from] sqlx::Error),
}

/// Linha da sacola já conferida contra o catálogo.
struct LinhaConferida {
    item: ItemSacola,
    preco_atual: BigDecimal,
    nome_atual: String,
}

pub fn calcular_subtotal(linhas: &[(BigDecimal, i32)]) -> BigDecimal {
    linhas
        .iter()
        .map(|(preco, quantidade)| preco * BigDecimal::from(*quantidade))
        .fold(BigDecimal::from(0), |acumulado, parcela| acumulado + parcela)
}

pub fn formatar_numero_pedido(sufixo: u32) -> String {
    format!("PED-{:04}", sufixo)
}

/// Executa o checkout do usuário autenticado.
pub async fn processar_checkout(
    state: &AppState,
    sacola: &SacolaStore,
    usuario: &UsuarioAutenticado,
    requisicao: &CheckoutRequest,
) -> Result<CheckoutResponse, ErroCheckout> {
    let itens_sacola = sacola.itens(usuario.usuario_id);
    if itens_sacola.is_empty() {
        return Err(ErroCheckout::SacolaVazia);
    }

    let mut tx = state.db_pool.begin().await?;

    // 1. Resolve o cliente pelo vínculo de usuário; cria o perfil mínimo se
    //    este for o primeiro checkout.
    let cliente_id = match sqlx::query_scalar::<_, i32>(
        "SELECT id FROM clientes WHERE usuario_id = $1",
    )
    .bind(usuario.usuario_id)
    .fetch_optional(&mut tx)
    .await?
    {
        Some(id) => id,
        None => {
            sqlx::query_scalar::<_, i32>(
                "INSERT INTO clientes (usuario_id, nome, email) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(usuario.usuario_id)
            .bind(&usuario.nome)
            .bind(&usuario.email)
            .fetch_one(&mut tx)
            .await?
        }
    };

    // Reenvio da mesma compra: devolve o pedido já gravado deste cliente.
    if let Some(chave) = &requisicao.chave_idempotencia {
        if let Some(existente) = buscar_por_chave(&mut tx, cliente_id, chave).await? {
            tracing::info!(
                "Checkout repetido com chave {}; devolvendo pedido {}",
                chave,
                existente.numero_pedido
            );
            return Ok(CheckoutResponse {
                pedido_id: existente.id,
                numero_pedido: existente.numero_pedido,
                total: existente.total,
                status_pagamento: "ja_registrado".to_string(),
                url_pagamento: None,
            });
        }
    }

    // 2. Endereço de entrega: reaproveita um idêntico ou insere.
    let endereco_id = resolver_endereco(&mut tx, cliente_id, &requisicao.endereco).await?;

    // 3. Confere cada linha contra o catálogo (preço atual, com trava de
    //    linha) e contra o saldo do razão de estoque.
    let mut linhas = Vec::with_capacity(itens_sacola.len());
    for item in itens_sacola {
        let produto = sqlx::query_as::<_, (String, BigDecimal)>(
            "SELECT nome, preco FROM produtos WHERE id = $1 AND ativo = TRUE FOR UPDATE",
        )
        .bind(item.produto_id)
        .fetch_optional(&mut tx)
        .await?;

        let Some((nome_atual, preco_atual)) = produto else {
            return Err(ErroCheckout::ProdutoIndisponivel(item.nome));
        };

        let saldo = saldo_estoque(&mut tx, item.produto_id).await?;
        if saldo < item.quantidade as i64 {
            return Err(ErroCheckout::EstoqueInsuficiente {
                produto: nome_atual,
                disponivel: saldo,
                solicitado: item.quantidade,
            });
        }

        linhas.push(LinhaConferida {
            item,
            preco_atual,
            nome_atual,
        });
    }

    let subtotal = calcular_subtotal(
        &linhas
            .iter()
            .map(|l| (l.preco_atual.clone(), l.item.quantidade))
            .collect::<Vec<_>>(),
    );

    // 4. Cupom, quando informado.
    let desconto = match &requisicao.cupom {
        Some(codigo) => {
            let cupom = query_as::<_, Cupom>(
                "SELECT id, codigo, tipo, valor, validade, ativo, criado_em \
                 FROM cupons WHERE UPPER(codigo) = UPPER($1)",
            )
            .bind(codigo)
            .fetch_optional(&mut tx)
            .await?;

            let Some(cupom) = cupom else {
                return Err(ErroCheckout::CupomRecusado(format!(
                    "Cupom {} não encontrado.",
                    codigo
                )));
            };

            match validar_cupom(&cupom, Utc::now()) {
                Ok(tipo) => calcular_desconto(&subtotal, tipo, &cupom.valor),
                Err(recusa) => {
                    return Err(ErroCheckout::CupomRecusado(recusa.mensagem().to_string()));
                }
            }
        }
        None => BigDecimal::from(0),
    };

    let total = &subtotal - &desconto + &requisicao.frete.valor;

    // 5. Número humano do pedido: prefixo fixo + sufixo sorteado, conferido
    //    contra os já usados (o índice único é a rede de segurança).
    let numero_pedido = gerar_numero_pedido(&mut tx).await?;

    // O retrato guarda também o id do endereço cadastrado que o originou.
    let mut endereco_snapshot = serde_json::to_value(&requisicao.endereco)
        .unwrap_or_else(|_| serde_json::json!({}));
    if let Some(campos) = endereco_snapshot.as_object_mut() {
        campos.insert("endereco_id".to_string(), serde_json::json!(endereco_id));
    }

    // 6. Grava o pedido e os retratos dos itens.
    let pedido = query_as::<_, Pedido>(
        "INSERT INTO pedidos \
         (numero_pedido, cliente_id, endereco_entrega, subtotal, desconto, frete, total, \
          status, forma_pagamento, chave_idempotencia) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING id, numero_pedido, cliente_id, endereco_entrega, subtotal, desconto, \
                   frete, total, status, forma_pagamento, chave_idempotencia, \
                   criado_em, atualizado_em",
    )
    .bind(&numero_pedido)
    .bind(cliente_id)
    .bind(&endereco_snapshot)
    .bind(&subtotal)
    .bind(&desconto)
    .bind(&requisicao.frete.valor)
    .bind(&total)
    .bind(STATUS_PENDENTE)
    .bind(requisicao.forma_pagamento.as_str())
    .bind(&requisicao.chave_idempotencia)
    .fetch_one(&mut tx)
    .await?;

    let mut itens_pedido = Vec::with_capacity(linhas.len());
    for linha in &linhas {
        let subtotal_linha = &linha.preco_atual * BigDecimal::from(linha.item.quantidade);
        let item = query_as::<_, ItemPedido>(
            "INSERT INTO itens_pedido \
             (pedido_id, produto_id, nome, quantidade, preco_unitario, subtotal, \
              tamanho, cor, material, imagem) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id, pedido_id, produto_id, nome, quantidade, preco_unitario, \
                       subtotal, tamanho, cor, material, imagem",
        )
        .bind(pedido.id)
        .bind(linha.item.produto_id)
        .bind(&linha.nome_atual)
        .bind(linha.item.quantidade)
        .bind(&linha.preco_atual)
        .bind(&subtotal_linha)
        .bind(&linha.item.tamanho)
        .bind(&linha.item.cor)
        .bind(&linha.item.material)
        .bind(&linha.item.imagem)
        .fetch_one(&mut tx)
        .await?;

        // 7. Baixa no razão de estoque, na mesma transação.
        sqlx::query(
            "INSERT INTO movimentacoes_estoque \
             (produto_id, tipo, quantidade, valor_unitario, valor_total, observacao, usuario) \
             VALUES ($1, 'saida', $2, $3, $4, $5, $6)",
        )
        .bind(linha.item.produto_id)
        .bind(linha.item.quantidade)
        .bind(&linha.preco_atual)
        .bind(&subtotal_linha)
        .bind(format!("Venda - pedido {}", numero_pedido))
        .bind(&usuario.nome)
        .execute(&mut tx)
        .await?;

        itens_pedido.push(item);
    }

    tx.commit().await?;

    // 8. Pedido gravado: limpa a sacola e dispara o efeito de pagamento.
    //    Falha daqui em diante não desfaz o pedido; fica registrada e o
    //    retorno avisa que o pagamento segue pendente.
    sacola.limpar(usuario.usuario_id);

    let (status_pagamento, url_pagamento) =
        disparar_pagamento(state, requisicao.forma_pagamento, &pedido, &itens_pedido).await;

    tracing::info!(
        "Pedido {} criado para cliente {} (total {})",
        pedido.numero_pedido,
        cliente_id,
        pedido.total
    );

    Ok(CheckoutResponse {
        pedido_id: pedido.id,
        numero_pedido: pedido.numero_pedido.clone(),
        total: pedido.total.clone(),
        status_pagamento,
        url_pagamento,
    })
}

async fn buscar_por_chave(
    tx: &mut Transaction<'_, Postgres>,
    cliente_id: i32,
    chave: &str,
) -> Result<Option<Pedido>, sqlx::Error> {
    query_as::<_, Pedido>(
        "SELECT id, numero_pedido, cliente_id, endereco_entrega, subtotal, desconto, \
                frete, total, status, forma_pagamento, chave_idempotencia, \
                criado_em, atualizado_em \
         FROM pedidos WHERE chave_idempotencia = $1 AND cliente_id = $2",
    )
    .bind(chave)
    .bind(cliente_id)
    .fetch_optional(&mut *tx)
    .await
}

async fn gerar_numero_pedido(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<String, ErroCheckout> {
    for _ in 0..MAX_TENTATIVAS_NUMERO {
        let sufixo = rand::thread_rng().gen_range(0..10_000u32);
        let numero = formatar_numero_pedido(sufixo);

        let em_uso = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM pedidos WHERE numero_pedido = $1)",
        )
        .bind(&numero)
        .fetch_one(&mut *tx)
        .await?;

        if !em_uso {
            return Ok(numero);
        }
    }
    Err(ErroCheckout::NumerosEsgotados)
}

/// Efeito de pagamento pós-commit. Retorna o status e, quando houver, a URL
/// de redirecionamento.
async fn disparar_pagamento(
    state: &AppState,
    forma: FormaPagamento,
    pedido: &Pedido,
    itens: &[ItemPedido],
) -> (String, Option<String>) {
    match forma {
        FormaPagamento::MercadoPago => {
            match state.pagamentos.criar_preferencia(pedido, itens).await {
                Ok(url) => ("preferencia_criada".to_string(), Some(url)),
                Err(ErroPagamento::NaoConfigurado) => {
                    tracing::warn!(
                        "Mercado Pago não configurado; pedido {} fica aguardando pagamento",
                        pedido.numero_pedido
                    );
                    ("pagamento_pendente".to_string(), None)
                }
                Err(e) => {
                    tracing::error!(
                        "Falha ao criar preferência para o pedido {}: {}",
                        pedido.numero_pedido,
                        e
                    );
                    ("pagamento_pendente".to_string(), None)
                }
            }
        }
        FormaPagamento::Pix | FormaPagamento::Cartao => {
            match state.pagamentos.disparar_webhook(pedido, itens).await {
                Ok(()) => ("webhook_enviado".to_string(), None),
                Err(e) => {
                    tracing::warn!(
                        "Webhook do pedido {} não enviado: {}",
                        pedido.numero_pedido,
                        e
                    );
                    ("pagamento_pendente".to_string(), None)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtotal_soma_preco_vezes_quantidade() {
        let linhas = [
            (BigDecimal::from(80), 2),
            (BigDecimal::from(120), 1),
        ];
        assert_eq!(calcular_subtotal(&linhas), BigDecimal::from(280));
    }

    #[test]
    fn subtotal_de_sacola_vazia_e_zero() {
        assert_eq!(calcular_subtotal(&[]), BigDecimal::from(0));
    }

    #[test]
    fn numero_de_pedido_tem_prefixo_e_quatro_digitos() {
        assert_eq!(formatar_numero_pedido(0), "PED-0000");
        assert_eq!(formatar_numero_pedido(7), "PED-0007");
        assert_eq!(formatar_numero_pedido(9_999), "PED-9999");
    }
}
