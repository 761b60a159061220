// src/banners/banner_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Banner exibido no carrossel da página inicial.
#[derive(Serialize, FromRow)]
pub struct Banner {
    pub id: i32,
    pub titulo: String,
    pub imagem_url: String,
    pub link: Option<String>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct NovoBanner {
    pub titulo: String,
    pub imagem_url: String,
    pub link: Option<String>,
}
