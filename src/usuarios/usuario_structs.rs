// src/usuarios/usuario_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura que representa um usuário no banco de dados.
/// A senha será armazenada como um hash.
#[derive(Serialize, FromRow)]
pub struct Usuario {
    pub id: i32,
    pub nome: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub senha_hash: String,
}

/// Estrutura para receber dados de um novo usuário na requisição de cadastro.
#[derive(Deserialize)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String, // Senha em texto claro (será hashed antes de salvar)
    pub telefone: Option<String>,
}

/// Estrutura para receber dados de login do usuário.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

/// Estrutura para o payload do JWT (Claims).
/// Contém informações sobre o usuário e a expiração do token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,     // Subject (ID do usuário)
    pub name: String, // Nome do usuário
    pub email: String,
    pub exp: i64, // Expiration Time (timestamp Unix)
}

/// Estrutura para a resposta de sucesso do login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub status: String,
    pub message: String,
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub token: String,
}

/// Linha da tabela `usuarios_admin`: quem pode acessar o painel e com qual papel.
#[derive(Serialize, FromRow)]
pub struct UsuarioAdmin {
    pub id: i32,
    pub usuario_id: Option<i32>,
    pub email: String,
    pub papel: String,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

/// Dados para criação de um usuário administrador (rota protegida).
#[derive(Deserialize)]
pub struct NovoUsuarioAdmin {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub papel: String,
}
