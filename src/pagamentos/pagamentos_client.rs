// src/pagamentos/pagamentos_client.rs

use std::time::Duration;

use bigdecimal::ToPrimitive;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::pedidos::pedido_structs::{ItemPedido, Pedido};

const TIMEOUT_PREFERENCIA: Duration = Duration::from_secs(10);
const TIMEOUT_WEBHOOK: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ErroPagamento {
    #[error("integração de pagamento não configurada")]
    NaoConfigurado,
    #[error("falha na chamada de pagamento: {0}")]
    Http(#[from] reqwest::Error),
    #[error("resposta inesperada do provedor: {0}")]
    RespostaInvalida(String),
}

/// Resposta da criação de preferência no Mercado Pago. Só o link de
/// redirecionamento interessa aqui.
#[derive(Deserialize)]
struct RespostaPreferencia {
    init_point: String,
}

/// Cliente das integrações de pagamento: criação de preferência no Mercado
/// Pago e webhook de novos pedidos. Integrações sem URL/token configurados
/// ficam desligadas.
#[derive(Clone)]
pub struct ClientePagamentos {
    http: reqwest::Client,
    mercado_pago_url: String,
    mercado_pago_token: Option<String>,
    webhook_pedidos_url: Option<String>,
}

impl ClientePagamentos {
    pub fn new(
        http: reqwest::Client,
        mercado_pago_url: String,
        mercado_pago_token: Option<String>,
        webhook_pedidos_url: Option<String>,
    ) -> Self {
        Self {
            http,
            mercado_pago_url,
            mercado_pago_token,
            webhook_pedidos_url,
        }
    }

    /// Cria a preferência de pagamento e retorna a URL de redirecionamento.
    pub async fn criar_preferencia(
        &self,
        pedido: &Pedido,
        itens: &[ItemPedido],
    ) -> Result<String, ErroPagamento> {
        let token = self
            .mercado_pago_token
            .as_ref()
            .ok_or(ErroPagamento::NaoConfigurado)?;

        let items: Vec<serde_json::Value> = itens
            .iter()
            .map(|item| {
                json!({
                    "title": item.nome,
                    "quantity": item.quantidade,
                    "unit_price": item.preco_unitario.to_f64().unwrap_or(0.0),
                    "currency_id": "BRL",
                })
            })
            .collect();

        let corpo = json!({
            "external_reference": pedido.numero_pedido,
            "items": items,
        });

        let resposta = self
            .http
            .post(format!("{}/checkout/preferences", self.mercado_pago_url))
            .bearer_auth(token)
            .json(&corpo)
            .timeout(TIMEOUT_PREFERENCIA)
            .send()
            .await?;

        if !resposta.status().is_success() {
            let status = resposta.status();
            let texto = resposta.text().await.unwrap_or_default();
            return Err(ErroPagamento::RespostaInvalida(format!(
                "status {}: {}",
                status, texto
            )));
        }

        let preferencia = resposta.json::<RespostaPreferencia>().await?;
        Ok(preferencia.init_point)
    }

    /// Avisa o webhook configurado sobre um pedido novo ou cancelado.
    pub async fn disparar_webhook(
        &self,
        pedido: &Pedido,
        itens: &[ItemPedido],
    ) -> Result<(), ErroPagamento> {
        let url = self
            .webhook_pedidos_url
            .as_ref()
            .ok_or(ErroPagamento::NaoConfigurado)?;

        let corpo = json!({
            "pedido": pedido,
            "itens": itens,
        });

        let resposta = self
            .http
            .post(url)
            .json(&corpo)
            .timeout(TIMEOUT_WEBHOOK)
            .send()
            .await?;

        if !resposta.status().is_success() {
            return Err(ErroPagamento::RespostaInvalida(format!(
                "status {}",
                resposta.status()
            )));
        }

        Ok(())
    }
}
