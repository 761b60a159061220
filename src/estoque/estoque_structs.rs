// src/estoque/estoque_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tipo de movimentação do razão de estoque.
#[derive(Deserialize, Serialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TipoMovimentacao {
    Entrada,
    Saida,
    Ajuste,
}

impl TipoMovimentacao {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoMovimentacao::Entrada => "entrada",
            TipoMovimentacao::Saida => "saida",
            TipoMovimentacao::Ajuste => "ajuste",
        }
    }
}

/// Linha do razão. Apenas inserções: o histórico nunca é editado, e o saldo
/// de um produto é a soma das movimentações.
#[derive(Serialize, FromRow)]
pub struct Movimentacao {
    pub id: i32,
    pub produto_id: i32,
    pub tipo: String,
    pub quantidade: i32,
    pub valor_unitario: Option<BigDecimal>,
    pub valor_total: Option<BigDecimal>,
    pub fornecedor: Option<String>,
    pub observacao: Option<String>,
    pub usuario: String,
    pub criado_em: DateTime<Utc>,
}

/// Dados de uma nova movimentação manual (painel).
#[derive(Deserialize)]
pub struct NovaMovimentacao {
    pub produto_id: i32,
    pub tipo: TipoMovimentacao,
    pub quantidade: i32,
    pub valor_unitario: Option<BigDecimal>,
    pub fornecedor: Option<String>,
    pub observacao: Option<String>,
}

#[derive(Deserialize)]
pub struct FiltroMovimentacoes {
    pub produto_id: Option<i32>,
}

/// Efeito de uma movimentação no saldo: entradas somam, saídas subtraem e
/// ajustes aplicam a quantidade com o sinal que ela carrega. Espelha o CASE
/// da consulta de saldo.
pub fn efeito_no_saldo(tipo: TipoMovimentacao, quantidade: i32) -> i64 {
    match tipo {
        TipoMovimentacao::Entrada => quantidade as i64,
        TipoMovimentacao::Saida => -(quantidade as i64),
        TipoMovimentacao::Ajuste => quantidade as i64,
    }
}

/// Saldo derivado do razão para um produto.
pub async fn saldo_estoque<'e, E>(executor: E, produto_id: i32) -> Result<i64, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(CASE tipo \
             WHEN 'entrada' THEN quantidade \
             WHEN 'saida' THEN -quantidade \
             ELSE quantidade END), 0)::BIGINT \
         FROM movimentacoes_estoque WHERE produto_id = $1",
    )
    .bind(produto_id)
    .fetch_one(executor)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entradas_somam_e_saidas_subtraem() {
        assert_eq!(efeito_no_saldo(TipoMovimentacao::Entrada, 10), 10);
        assert_eq!(efeito_no_saldo(TipoMovimentacao::Saida, 4), -4);
    }

    #[test]
    fn ajuste_aplica_o_sinal_da_quantidade() {
        assert_eq!(efeito_no_saldo(TipoMovimentacao::Ajuste, 3), 3);
        assert_eq!(efeito_no_saldo(TipoMovimentacao::Ajuste, -3), -3);
    }

    #[test]
    fn saldo_de_uma_sequencia_de_movimentos() {
        let movimentos = [
            (TipoMovimentacao::Entrada, 20),
            (TipoMovimentacao::Saida, 5),
            (TipoMovimentacao::Saida, 2),
            (TipoMovimentacao::Ajuste, -1),
        ];
        let saldo: i64 = movimentos
            .iter()
            .map(|(tipo, qtd)| efeito_no_saldo(*tipo, *qtd))
            .sum();
        assert_eq!(saldo, 12);
    }

    #[test]
    fn tipo_serializa_em_minusculas() {
        assert_eq!(
            serde_json::to_string(&TipoMovimentacao::Saida).unwrap(),
            "\"saida\""
        );
        let tipo: TipoMovimentacao = serde_json::from_str("\"ajuste\"").unwrap();
        assert_eq!(tipo, TipoMovimentacao::Ajuste);
    }
}
