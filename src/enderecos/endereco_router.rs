// src/enderecos/endereco_router.rs

use std::time::Duration;

use actix_web::{get, post, web, HttpResponse};
use sqlx::query_as;

use super::endereco_structs::{
    normalizar_cep, CepResponse, DadosEndereco, Endereco, RespostaViaCep,
};
use crate::shared::shared_structs::{erro_interno, GenericResponse};
use crate::usuarios::auth_middleware::UsuarioAutenticado;
use crate::AppState;

const VIACEP_URL: &str = "https://viacep.com.br/ws";
const TIMEOUT_CEP: Duration = Duration::from_secs(5);

/// Consulta o serviço público de CEP para preencher o formulário de endereço.
#[get("/cep/{cep}")]
pub async fn consultar_cep(data: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let Some(cep) = normalizar_cep(&path.into_inner()) else {
        return HttpResponse::BadRequest()
            .json(GenericResponse::erro("CEP inválido. Informe 8 dígitos."));
    };

    let url = format!("{}/{}/json/", VIACEP_URL, cep);
    let resposta = data
        .http
        .get(&url)
        .timeout(TIMEOUT_CEP)
        .send()
        .await;

    let resposta = match resposta {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Consulta de CEP {} falhou: {}", cep, e);
            return HttpResponse::BadGateway()
                .json(GenericResponse::erro("Serviço de CEP indisponível no momento."));
        }
    };

    let corpo = match resposta.json::<RespostaViaCep>().await {
        Ok(c) => c,
        Err(e) => return erro_interno("Resposta inesperada do serviço de CEP", e),
    };

    if corpo.erro {
        return HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "CEP {} não encontrado.",
            cep
        )));
    }

    HttpResponse::Ok().json(GenericResponse::com_corpo(
        "Endereço localizado.",
        CepResponse::from(corpo),
    ))
}

/// Lista os endereços do cliente autenticado.
#[get("/enderecos")]
pub async fn listar_enderecos(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
) -> HttpResponse {
    let resultado = query_as::<_, Endereco>(
        "SELECT e.id, e.cliente_id, e.cep, e.logradouro, e.numero, e.complemento, \
                e.bairro, e.cidade, e.uf, e.criado_em \
         FROM enderecos e \
         JOIN clientes c ON c.id = e.cliente_id \
         WHERE c.usuario_id = $1 \
         ORDER BY e.criado_em DESC",
    )
    .bind(usuario.usuario_id)
    .fetch_all(&data.db_pool)
    .await;

    match resultado {
        Ok(enderecos) => {
            HttpResponse::Ok().json(GenericResponse::com_corpo("Endereços do cliente", enderecos))
        }
        Err(e) => erro_interno("Erro ao listar endereços", e),
    }
}

/// Cadastra um endereço para o cliente autenticado. Um endereço idêntico já
/// cadastrado (mesmo CEP, logradouro e número) é reaproveitado.
#[post("/enderecos")]
pub async fn cadastrar_endereco(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    corpo: web::Json<DadosEndereco>,
) -> HttpResponse {
    let cliente_id = match sqlx::query_scalar::<_, i32>(
        "SELECT id FROM clientes WHERE usuario_id = $1",
    )
    .bind(usuario.usuario_id)
    .fetch_optional(&data.db_pool)
    .await
    {
        Ok(Some(id)) => id,
        Ok(None) => {
            return HttpResponse::NotFound().json(GenericResponse::erro(
                "Perfil de cliente não encontrado.",
            ));
        }
        Err(e) => return erro_interno("Erro ao localizar cliente", e),
    };

    let mut tx = match data.db_pool.begin().await {
        Ok(tx) => tx,
        Err(e) => return erro_interno("Erro ao iniciar transação de endereço", e),
    };

    let endereco_id = match resolver_endereco(&mut tx, cliente_id, &corpo).await {
        Ok(id) => id,
        Err(e) => return erro_interno("Erro ao salvar endereço", e),
    };

    if let Err(e) = tx.commit().await {
        return erro_interno("Erro ao concluir cadastro de endereço", e);
    }

    HttpResponse::Ok().json(GenericResponse::com_corpo(
        "Endereço salvo com sucesso!",
        serde_json::json!({ "id": endereco_id }),
    ))
}

/// Reaproveita um endereço idêntico do cliente ou insere um novo.
/// Usado tanto pela rota de endereços quanto pelo checkout.
pub async fn resolver_endereco(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    cliente_id: i32,
    dados: &DadosEndereco,
) -> Result<i32, sqlx::Error> {
    let existente = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM enderecos \
         WHERE cliente_id = $1 AND cep = $2 AND logradouro = $3 AND numero = $4 \
         LIMIT 1",
    )
    .bind(cliente_id)
    .bind(&dados.cep)
    .bind(&dados.logradouro)
    .bind(&dados.numero)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(id) = existente {
        return Ok(id);
    }

    sqlx::query_scalar::<_, i32>(
        "INSERT INTO enderecos (cliente_id, cep, logradouro, numero, complemento, bairro, cidade, uf) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
    )
    .bind(cliente_id)
    .bind(&dados.cep)
    .bind(&dados.logradouro)
    .bind(&dados.numero)
    .bind(&dados.complemento)
    .bind(&dados.bairro)
    .bind(&dados.cidade)
    .bind(&dados.uf)
    .fetch_one(&mut *tx)
    .await
}
