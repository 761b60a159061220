// src/usuarios/admin_cache.rs

use std::future::Future;
use std::time::Duration;

use actix_web::rt;
use moka::future::Cache;
use sqlx::{Pool, Postgres};
use thiserror::Error;

/// Papéis aceitos na tabela `usuarios_admin`, comparados sem diferenciar
/// maiúsculas de minúsculas.
const PAPEIS_ADMIN: [&str; 5] = [
    "admin",
    "administrador",
    "super_admin",
    "superadmin",
    "administrator",
];

/// Tempo de vida de cada entrada do cache de checagem de admin.
const TTL_CACHE: Duration = Duration::from_secs(5 * 60);

/// Limite de espera pela consulta ao banco; estourando, a checagem falha
/// fechada (não-admin) e nada é gravado no cache.
const TIMEOUT_CONSULTA: Duration = Duration::from_secs(5);

/// Cache de resultado da checagem de admin, chaveado por (usuario_id, email).
pub type CacheAdmin = Cache<(i32, String), bool>;

pub fn novo_cache_admin() -> CacheAdmin {
    Cache::builder()
        .max_capacity(1_000)
        .time_to_live(TTL_CACHE)
        .build()
}

#[derive(Debug, Error)]
pub enum ErroVerificacaoAdmin {
    #[error("tempo esgotado na consulta de admin")]
    Timeout,
    #[error("erro de banco na consulta de admin: {0}")]
    Banco(#[from] sqlx::Error),
}

pub fn papel_permitido(papel: &str) -> bool {
    PAPEIS_ADMIN
        .iter()
        .any(|p| p.eq_ignore_ascii_case(papel.trim()))
}

/// Consulta o cache e, na ausência de entrada, delega para `consulta`.
/// Chamadas concorrentes com a mesma chave compartilham uma única consulta
/// em voo (`try_get_with`); erros não são gravados no cache.
pub async fn checar_com_cache<F>(cache: &CacheAdmin, chave: (i32, String), consulta: F) -> bool
where
    F: Future<Output = Result<bool, ErroVerificacaoAdmin>>,
{
    match cache.try_get_with(chave, consulta).await {
        Ok(eh_admin) => eh_admin,
        Err(e) => {
            tracing::warn!("Checagem de admin falhou, assumindo não-admin: {}", e);
            false
        }
    }
}

/// Resolve se o usuário autenticado é administrador.
///
/// A tabela `usuarios_admin` é consultada com filtro OR sobre o vínculo de
/// usuário e o e-mail; o papel retornado precisa estar na lista de papéis
/// aceitos. O e-mail configurado em `SUPER_ADMIN_EMAIL` passa sem consulta,
/// servindo de porta de entrada para o primeiro administrador.
pub async fn verificar_admin(
    pool: &Pool<Postgres>,
    cache: &CacheAdmin,
    super_admin_email: Option<&str>,
    usuario_id: i32,
    email: &str,
) -> bool {
    if let Some(super_email) = super_admin_email {
        if super_email.eq_ignore_ascii_case(email) {
            return true;
        }
    }

    let pool = pool.clone();
    let email_consulta = email.to_string();
    let chave = (usuario_id, email.to_lowercase());

    checar_com_cache(cache, chave, async move {
        let consulta = sqlx::query_scalar::<_, String>(
            "SELECT papel FROM usuarios_admin \
             WHERE ativo = TRUE AND (usuario_id = $1 OR LOWER(email) = LOWER($2)) \
             LIMIT 1",
        )
        .bind(usuario_id)
        .bind(&email_consulta)
        .fetch_optional(&pool);

        match rt::time::timeout(TIMEOUT_CONSULTA, consulta).await {
            Ok(Ok(papel)) => Ok(papel.map(|p| papel_permitido(&p)).unwrap_or(false)),
            Ok(Err(e)) => Err(ErroVerificacaoAdmin::Banco(e)),
            Err(_) => Err(ErroVerificacaoAdmin::Timeout),
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn papel_permitido_ignora_caixa() {
        assert!(papel_permitido("admin"));
        assert!(papel_permitido("Administrador"));
        assert!(papel_permitido("SUPER_ADMIN"));
        assert!(papel_permitido(" superadmin "));
        assert!(papel_permitido("administrator"));
        assert!(!papel_permitido("atendente"));
        assert!(!papel_permitido(""));
    }

    #[actix_web::test]
    async fn chamadas_concorrentes_compartilham_uma_consulta() {
        let cache = novo_cache_admin();
        let contador = Arc::new(AtomicUsize::new(0));
        let chave = (1, "a@loja.com".to_string());

        let consulta = |contador: Arc<AtomicUsize>| async move {
            contador.fetch_add(1, Ordering::SeqCst);
            Ok::<bool, ErroVerificacaoAdmin>(true)
        };

        let (r1, r2) = futures::join!(
            checar_com_cache(&cache, chave.clone(), consulta(contador.clone())),
            checar_com_cache(&cache, chave.clone(), consulta(contador.clone())),
        );

        assert!(r1 && r2);
        assert_eq!(contador.load(Ordering::SeqCst), 1);

        // Dentro da janela de TTL, uma nova chamada também não consulta.
        let r3 = checar_com_cache(&cache, chave, consulta(contador.clone())).await;
        assert!(r3);
        assert_eq!(contador.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn erro_nao_fica_no_cache() {
        let cache = novo_cache_admin();
        let contador = Arc::new(AtomicUsize::new(0));
        let chave = (2, "b@loja.com".to_string());

        let c1 = contador.clone();
        let falha = checar_com_cache(&cache, chave.clone(), async move {
            c1.fetch_add(1, Ordering::SeqCst);
            Err::<bool, _>(ErroVerificacaoAdmin::Timeout)
        })
        .await;
        assert!(!falha);

        let c2 = contador.clone();
        let sucesso = checar_com_cache(&cache, chave, async move {
            c2.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        })
        .await;
        assert!(sucesso);
        assert_eq!(contador.load(Ordering::SeqCst), 2);
    }
}
