// src/enderecos/endereco_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Endereço de entrega de um cliente.
#[derive(Serialize, FromRow)]
pub struct Endereco {
    pub id: i32,
    pub cliente_id: i32,
    pub cep: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: String,
    pub uf: String,
    pub criado_em: DateTime<Utc>,
}

/// Dados de endereço vindos do formulário de checkout/conta.
#[derive(Deserialize, Serialize, Clone)]
pub struct DadosEndereco {
    pub cep: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: String,
    pub uf: String,
}

/// Resposta do serviço público de CEP (ViaCEP). Um CEP inexistente volta
/// com `{"erro": true}` e status 200, daí o campo com default.
#[derive(Deserialize)]
pub struct RespostaViaCep {
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default)]
    pub erro: bool,
}

/// Campos do formulário de endereço preenchidos a partir do CEP.
#[derive(Serialize, PartialEq, Debug)]
pub struct CepResponse {
    pub cep: String,
    pub logradouro: String,
    pub bairro: String,
    pub cidade: String,
    pub uf: String,
}

impl From<RespostaViaCep> for CepResponse {
    fn from(r: RespostaViaCep) -> Self {
        CepResponse {
            cep: r.cep,
            logradouro: r.logradouro,
            bairro: r.bairro,
            cidade: r.localidade,
            uf: r.uf,
        }
    }
}

/// Normaliza um CEP para os 8 dígitos, descartando separadores.
/// Retorna None quando o resultado não tem exatamente 8 dígitos.
pub fn normalizar_cep(cep: &str) -> Option<String> {
    let digitos: String = cep.chars().filter(|c| c.is_ascii_digit()).collect();
    if digitos.len() == 8 {
        Some(digitos)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normaliza_cep_com_e_sem_separador() {
        assert_eq!(normalizar_cep("01310-100"), Some("01310100".to_string()));
        assert_eq!(normalizar_cep("01310100"), Some("01310100".to_string()));
        assert_eq!(normalizar_cep(" 01310 100 "), Some("01310100".to_string()));
    }

    #[test]
    fn cep_invalido_retorna_none() {
        assert_eq!(normalizar_cep("1234"), None);
        assert_eq!(normalizar_cep("012345678"), None);
        assert_eq!(normalizar_cep("abcdefgh"), None);
    }

    #[test]
    fn resposta_viacep_mapeia_para_campos_do_formulario() {
        let json = r#"{
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP",
            "ibge": "3550308",
            "ddd": "11"
        }"#;

        let resposta: RespostaViaCep = serde_json::from_str(json).unwrap();
        assert!(!resposta.erro);

        let cep: CepResponse = resposta.into();
        assert_eq!(
            cep,
            CepResponse {
                cep: "01310-100".to_string(),
                logradouro: "Avenida Paulista".to_string(),
                bairro: "Bela Vista".to_string(),
                cidade: "São Paulo".to_string(),
                uf: "SP".to_string(),
            }
        );
    }

    #[test]
    fn cep_desconhecido_vem_com_erro_true() {
        let resposta: RespostaViaCep = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(resposta.erro);
    }
}
