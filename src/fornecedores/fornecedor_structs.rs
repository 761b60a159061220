// src/fornecedores/fornecedor_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, FromRow)]
pub struct Fornecedor {
    pub id: i32,
    pub nome: String,
    pub cnpj: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct NovoFornecedor {
    pub nome: String,
    pub cnpj: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
}
