// src/pedidos/pedido_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::enderecos::endereco_structs::DadosEndereco;

// Estados possíveis de um pedido.
pub const STATUS_PENDENTE: &str = "pendente";
pub const STATUS_PAGO: &str = "pago";
pub const STATUS_ENVIADO: &str = "enviado";
pub const STATUS_ENTREGUE: &str = "entregue";
pub const STATUS_CANCELADO: &str = "cancelado";

/// Pedido gravado no banco. `endereco_entrega` é um retrato do endereço no
/// momento da compra, independente de edições futuras no cadastro.
#[derive(Serialize, FromRow)]
pub struct Pedido {
    pub id: i32,
    pub numero_pedido: String,
    pub cliente_id: i32,
    pub endereco_entrega: serde_json::Value,
    pub subtotal: BigDecimal,
    pub desconto: BigDecimal,
    pub frete: BigDecimal,
    pub total: BigDecimal,
    pub status: String,
    pub forma_pagamento: String,
    pub chave_idempotencia: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Pedido com o nome do cliente, como o painel lista.
#[derive(Serialize, FromRow)]
pub struct PedidoComCliente {
    pub id: i32,
    pub numero_pedido: String,
    pub cliente_id: i32,
    pub cliente_nome: String,
    pub subtotal: BigDecimal,
    pub desconto: BigDecimal,
    pub frete: BigDecimal,
    pub total: BigDecimal,
    pub status: String,
    pub forma_pagamento: String,
    pub criado_em: DateTime<Utc>,
}

/// Item de pedido: retrato do item da sacola no momento da compra.
#[derive(Serialize, FromRow, Clone)]
pub struct ItemPedido {
    pub id: i32,
    pub pedido_id: i32,
    pub produto_id: i32,
    pub nome: String,
    pub quantidade: i32,
    pub preco_unitario: BigDecimal,
    pub subtotal: BigDecimal,
    pub tamanho: Option<String>,
    pub cor: Option<String>,
    pub material: Option<String>,
    pub imagem: Option<String>,
}

/// Forma de pagamento escolhida no checkout. Define o efeito colateral
/// disparado depois da gravação: preferência no Mercado Pago ou webhook.
#[derive(Deserialize, Serialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum FormaPagamento {
    Pix,
    Cartao,
    MercadoPago,
}

impl FormaPagamento {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormaPagamento::Pix => "pix",
            FormaPagamento::Cartao => "cartao",
            FormaPagamento::MercadoPago => "mercado_pago",
        }
    }
}

#[derive(Deserialize)]
pub struct Frete {
    pub valor: BigDecimal,
    pub metodo: String,
}

/// Corpo do POST /checkout.
#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub endereco: DadosEndereco,
    pub frete: Frete,
    pub forma_pagamento: FormaPagamento,
    pub cupom: Option<String>,
    /// Reenvios com a mesma chave devolvem o pedido já criado em vez de
    /// gravar um segundo.
    pub chave_idempotencia: Option<String>,
}

/// Resultado do checkout devolvido à loja.
#[derive(Serialize)]
pub struct CheckoutResponse {
    pub pedido_id: i32,
    pub numero_pedido: String,
    pub total: BigDecimal,
    pub status_pagamento: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_pagamento: Option<String>,
}

/// Corpo do PATCH de status no painel.
#[derive(Deserialize)]
pub struct AtualizarStatus {
    pub status: String,
}

/// Estados que o painel pode aplicar diretamente. Cancelamento fica de fora:
/// tem rota própria, porque repõe estoque.
pub fn status_aplicavel(status: &str) -> bool {
    matches!(
        status,
        STATUS_PENDENTE | STATUS_PAGO | STATUS_ENVIADO | STATUS_ENTREGUE
    )
}

/// Movimentação de reposição gerada no cancelamento de um pedido: uma
/// entrada por item, espelhando as quantidades vendidas.
pub struct Reposicao {
    pub produto_id: i32,
    pub quantidade: i32,
    pub valor_unitario: BigDecimal,
    pub valor_total: BigDecimal,
    pub observacao: String,
}

pub fn movimentos_de_reposicao(itens: &[ItemPedido], numero_pedido: &str) -> Vec<Reposicao> {
    itens
        .iter()
        .map(|item| Reposicao {
            produto_id: item.produto_id,
            quantidade: item.quantidade,
            valor_unitario: item.preco_unitario.clone(),
            valor_total: item.subtotal.clone(),
            observacao: format!("Cancelamento do pedido {}", numero_pedido),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(produto_id: i32, quantidade: i32, preco: i32) -> ItemPedido {
        ItemPedido {
            id: 1,
            pedido_id: 1,
            produto_id,
            nome: "Vestido".to_string(),
            quantidade,
            preco_unitario: BigDecimal::from(preco),
            subtotal: BigDecimal::from(preco * quantidade),
            tamanho: None,
            cor: None,
            material: None,
            imagem: None,
        }
    }

    #[test]
    fn reposicao_espelha_quantidades_dos_itens() {
        let itens = [item(1, 2, 80), item(5, 1, 120)];
        let reposicoes = movimentos_de_reposicao(&itens, "PED-0042");

        assert_eq!(reposicoes.len(), 2);
        assert_eq!(reposicoes[0].produto_id, 1);
        assert_eq!(reposicoes[0].quantidade, 2);
        assert_eq!(reposicoes[0].valor_total, BigDecimal::from(160));
        assert_eq!(reposicoes[1].produto_id, 5);
        assert!(reposicoes[1].observacao.contains("PED-0042"));
    }

    #[test]
    fn cancelado_nao_e_aplicavel_pelo_patch_de_status() {
        assert!(status_aplicavel(STATUS_PAGO));
        assert!(status_aplicavel(STATUS_ENVIADO));
        assert!(!status_aplicavel(STATUS_CANCELADO));
        assert!(!status_aplicavel("qualquer"));
    }

    #[test]
    fn forma_pagamento_serializa_em_snake_case() {
        let forma: FormaPagamento = serde_json::from_str("\"mercado_pago\"").unwrap();
        assert_eq!(forma, FormaPagamento::MercadoPago);
        assert_eq!(forma.as_str(), "mercado_pago");
    }
}
