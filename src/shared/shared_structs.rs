// src/shared/shared_structs.rs

use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

/// Estrutura genérica para padronizar as respostas da API.
/// 'T' é o tipo do corpo da resposta, que pode ser opcional.
#[derive(Serialize)]
pub struct GenericResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] // Não serializa 'body' se for None
    pub body: Option<T>,
}

impl GenericResponse<()> {
    pub fn erro(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            body: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            body: None,
        }
    }
}

impl<T: Serialize> GenericResponse<T> {
    pub fn com_corpo(message: impl Into<String>, body: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            body: Some(body),
        }
    }
}

/// Corpo padrão das rotas PATCH de ativação/desativação.
#[derive(Deserialize)]
pub struct AtualizarAtivo {
    pub ativo: bool,
}

/// Registra o erro no log e devolve um 500 com a mensagem de contexto.
pub fn erro_interno<E: std::fmt::Debug>(contexto: &str, err: E) -> HttpResponse {
    tracing::error!("{}: {:?}", contexto, err);
    HttpResponse::InternalServerError().json(GenericResponse::erro(contexto))
}
