// src/cupons/cupom_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cupom de desconto. `tipo` é 'percentual' (valor em %) ou 'fixo'
/// (valor em reais).
#[derive(Serialize, FromRow, Clone)]
pub struct Cupom {
    pub id: i32,
    pub codigo: String,
    pub tipo: String,
    pub valor: BigDecimal,
    pub validade: Option<DateTime<Utc>>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct NovoCupom {
    pub codigo: String,
    pub tipo: TipoCupom,
    pub valor: BigDecimal,
    pub validade: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TipoCupom {
    Percentual,
    Fixo,
}

impl TipoCupom {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoCupom::Percentual => "percentual",
            TipoCupom::Fixo => "fixo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "percentual" => Some(TipoCupom::Percentual),
            "fixo" => Some(TipoCupom::Fixo),
            _ => None,
        }
    }
}

/// Por que um cupom não pode ser aplicado.
#[derive(Debug, PartialEq)]
pub enum CupomRecusado {
    Inativo,
    Expirado,
    TipoDesconhecido,
}

impl CupomRecusado {
    pub fn mensagem(&self) -> &'static str {
        match self {
            CupomRecusado::Inativo => "Cupom inativo.",
            CupomRecusado::Expirado => "Cupom expirado.",
            CupomRecusado::TipoDesconhecido => "Cupom com configuração inválida.",
        }
    }
}

/// Valida o cupom contra o instante atual.
pub fn validar_cupom(cupom: &Cupom, agora: DateTime<Utc>) -> Result<TipoCupom, CupomRecusado> {
    if !cupom.ativo {
        return Err(CupomRecusado::Inativo);
    }
    if let Some(validade) = cupom.validade {
        if validade < agora {
            return Err(CupomRecusado::Expirado);
        }
    }
    TipoCupom::parse(&cupom.tipo).ok_or(CupomRecusado::TipoDesconhecido)
}

/// Calcula o desconto de um cupom sobre o subtotal. O desconto nunca passa
/// do subtotal (o total não fica negativo).
pub fn calcular_desconto(subtotal: &BigDecimal, tipo: TipoCupom, valor: &BigDecimal) -> BigDecimal {
    let bruto = match tipo {
        TipoCupom::Percentual => (subtotal * valor) / BigDecimal::from(100),
        TipoCupom::Fixo => valor.clone(),
    };

    if bruto > *subtotal {
        subtotal.clone()
    } else {
        bruto
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn cupom(tipo: &str, valor: i32, ativo: bool, validade: Option<DateTime<Utc>>) -> Cupom {
        Cupom {
            id: 1,
            codigo: "PROMO10".to_string(),
            tipo: tipo.to_string(),
            valor: BigDecimal::from(valor),
            validade,
            ativo,
            criado_em: Utc::now(),
        }
    }

    #[test]
    fn desconto_percentual() {
        let desconto = calcular_desconto(
            &BigDecimal::from(200),
            TipoCupom::Percentual,
            &BigDecimal::from(10),
        );
        assert_eq!(desconto, BigDecimal::from(20));
    }

    #[test]
    fn desconto_fixo() {
        let desconto = calcular_desconto(
            &BigDecimal::from(200),
            TipoCupom::Fixo,
            &BigDecimal::from(30),
        );
        assert_eq!(desconto, BigDecimal::from(30));
    }

    #[test]
    fn desconto_nao_passa_do_subtotal() {
        let desconto = calcular_desconto(
            &BigDecimal::from(25),
            TipoCupom::Fixo,
            &BigDecimal::from(50),
        );
        assert_eq!(desconto, BigDecimal::from(25));
    }

    #[test]
    fn cupom_ativo_e_dentro_da_validade_passa() {
        let c = cupom("percentual", 10, true, Some(Utc::now() + Duration::days(1)));
        assert_eq!(validar_cupom(&c, Utc::now()), Ok(TipoCupom::Percentual));
    }

    #[test]
    fn cupom_sem_validade_nao_expira() {
        let c = cupom("fixo", 15, true, None);
        assert_eq!(validar_cupom(&c, Utc::now()), Ok(TipoCupom::Fixo));
    }

    #[test]
    fn cupom_inativo_ou_expirado_e_recusado() {
        let inativo = cupom("fixo", 15, false, None);
        assert_eq!(validar_cupom(&inativo, Utc::now()), Err(CupomRecusado::Inativo));

        let expirado = cupom("fixo", 15, true, Some(Utc::now() - Duration::days(1)));
        assert_eq!(validar_cupom(&expirado, Utc::now()), Err(CupomRecusado::Expirado));
    }

    #[test]
    fn tipo_desconhecido_e_recusado() {
        let c = cupom("brinde", 1, true, None);
        assert_eq!(
            validar_cupom(&c, Utc::now()),
            Err(CupomRecusado::TipoDesconhecido)
        );
    }
}
