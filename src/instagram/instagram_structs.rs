// src/instagram/instagram_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Publicação do Instagram exibida na vitrine.
#[derive(Serialize, FromRow)]
pub struct LinkInstagram {
    pub id: i32,
    pub url: String,
    pub imagem_url: Option<String>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct NovoLinkInstagram {
    pub url: String,
    pub imagem_url: Option<String>,
}
