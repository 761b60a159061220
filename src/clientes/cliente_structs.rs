// src/clientes/cliente_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Perfil de cliente da loja. O vínculo com `usuarios` é a única chave de
/// ligação com a autenticação; e-mail é dado de contato, não identidade.
#[derive(Serialize, FromRow)]
pub struct Cliente {
    pub id: i32,
    pub usuario_id: Option<i32>,
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub cpf: Option<String>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

/// Dados editáveis do próprio perfil.
#[derive(Deserialize)]
pub struct AtualizarPerfil {
    pub nome: String,
    pub telefone: Option<String>,
    pub cpf: Option<String>,
}

/// Filtro de busca da listagem do painel.
#[derive(Deserialize)]
pub struct FiltroClientes {
    pub busca: Option<String>,
}
