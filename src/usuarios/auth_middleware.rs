// src/usuarios/auth_middleware.rs

use actix_web::{dev::Payload, error::ErrorUnauthorized, web, FromRequest, HttpRequest};

use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::admin_cache::verificar_admin;
use super::usuario_structs::Claims;
use crate::AppState;

/// Struct que representa o usuário autenticado, contendo as claims do JWT.
/// Será extraída das requisições protegidas.
#[derive(Debug, Clone)]
pub struct UsuarioAutenticado {
    pub usuario_id: i32,
    pub nome: String,
    pub email: String,
}

/// Extrator de autenticação para Actix Web.
/// Este extrator tenta validar um token JWT presente no cabeçalho Authorization.
impl FromRequest for UsuarioAutenticado {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Acessa o AppState para obter a chave secreta JWT
        let jwt_secret = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.jwt_secret.clone(),
            None => {
                tracing::error!("AppState indisponível no extrator de autenticação");
                return ready(Err(ErrorUnauthorized("Erro de configuração do servidor.")));
            }
        };

        let token = match req.headers().get("Authorization") {
            Some(header_value) => {
                let header_str = match header_value.to_str() {
                    Ok(s) => s,
                    Err(_) => {
                        return ready(Err(ErrorUnauthorized("Token de autenticação inválido.")))
                    }
                };

                // Verifica se o cabeçalho começa com "Bearer "
                if let Some(resto) = header_str.strip_prefix("Bearer ") {
                    resto.to_string()
                } else {
                    return ready(Err(ErrorUnauthorized(
                        "Formato de token inválido. Esperado 'Bearer <token>'.",
                    )));
                }
            }
            None => {
                return ready(Err(ErrorUnauthorized("Token de autenticação ausente.")));
            }
        };

        let validation = Validation::new(Algorithm::HS256);

        let token_data = match decode::<Claims>(
            &token,
            &DecodingKey::from_secret(jwt_secret.as_ref()),
            &validation,
        ) {
            Ok(data) => data,
            Err(e) => {
                let mensagem = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        "Assinatura do token inválida."
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
                    _ => "Token de autenticação inválido.",
                };
                return ready(Err(ErrorUnauthorized(mensagem)));
            }
        };

        ready(Ok(UsuarioAutenticado {
            usuario_id: token_data.claims.sub,
            nome: token_data.claims.name,
            email: token_data.claims.email,
        }))
    }
}

/// Extrator das rotas do painel: exige usuário autenticado E administrador.
///
/// A resolução de papel consulta `usuarios_admin` através do cache com TTL de
/// 5 minutos; chamadas concorrentes para a mesma identidade compartilham uma
/// única consulta em voo.
#[derive(Debug, Clone)]
pub struct Admin(pub UsuarioAutenticado);

impl FromRequest for Admin {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let usuario = UsuarioAutenticado::from_request(req, payload).into_inner();
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let usuario = usuario?;
            let state = state.ok_or_else(|| {
                tracing::error!("AppState indisponível no extrator de admin");
                ErrorUnauthorized("Erro de configuração do servidor.")
            })?;

            let eh_admin = verificar_admin(
                &state.db_pool,
                &state.cache_admin,
                state.super_admin_email.as_deref(),
                usuario.usuario_id,
                &usuario.email,
            )
            .await;

            if eh_admin {
                Ok(Admin(usuario))
            } else {
                Err(ErrorUnauthorized(
                    "Acesso restrito a administradores da loja.",
                ))
            }
        })
    }
}
