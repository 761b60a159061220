// src/categorias/categoria_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura para receber dados de uma nova categoria na requisição POST/PUT.
#[derive(Deserialize)]
pub struct NovaCategoria {
    pub nome: String,
    pub descricao: Option<String>,
}

/// Estrutura que representa uma categoria no banco de dados.
#[derive(Serialize, FromRow)]
pub struct Categoria {
    pub id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}
