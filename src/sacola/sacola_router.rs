// src/sacola/sacola_router.rs

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;
use sqlx::query_as;

use super::sacola_structs::{ItemSacola, SacolaStore};
use crate::produtos::produtos_structs::Produto;
use crate::shared::shared_structs::{erro_interno, GenericResponse};
use crate::usuarios::auth_middleware::UsuarioAutenticado;
use crate::AppState;

#[derive(Deserialize)]
pub struct NovoItemSacola {
    pub produto_id: i32,
    pub quantidade: i32,
    pub tamanho: Option<String>,
    pub cor: Option<String>,
}

#[derive(Deserialize)]
pub struct AtualizarQuantidade {
    pub quantidade: i32,
}

/// Rota para visualizar o conteúdo atual da sacola do usuário.
#[get("/sacola")]
pub async fn ver_sacola(
    sacola: web::Data<SacolaStore>,
    usuario: UsuarioAutenticado,
) -> HttpResponse {
    let itens = sacola.itens(usuario.usuario_id);
    let total = sacola.total_itens(usuario.usuario_id);

    HttpResponse::Ok().json(GenericResponse::com_corpo(
        "Conteúdo da sacola",
        serde_json::json!({ "itens": itens, "total_itens": total }),
    ))
}

/// Adiciona um item à sacola. O produto precisa existir e estar ativo; nome,
/// preço e imagem vêm do catálogo, nunca do corpo da requisição.
#[post("/sacola/itens")]
pub async fn adicionar_item_sacola(
    data: web::Data<AppState>,
    sacola: web::Data<SacolaStore>,
    usuario: UsuarioAutenticado,
    novo_item: web::Json<NovoItemSacola>,
) -> HttpResponse {
    if novo_item.quantidade <= 0 {
        return HttpResponse::BadRequest()
            .json(GenericResponse::erro("A quantidade deve ser maior que zero."));
    }

    let produto = query_as::<_, Produto>(
        "SELECT id, nome, descricao, preco, categoria_id, material, imagem_url, ativo, \
                criado_em, atualizado_em \
         FROM produtos WHERE id = $1 AND ativo = TRUE",
    )
    .bind(novo_item.produto_id)
    .fetch_optional(&data.db_pool)
    .await;

    let produto = match produto {
        Ok(Some(p)) => p,
        Ok(None) => {
            return HttpResponse::BadRequest().json(GenericResponse::erro(format!(
                "Produto com ID {} não encontrado para adicionar à sacola.",
                novo_item.produto_id
            )));
        }
        Err(e) => return erro_interno("Erro ao verificar produto para a sacola", e),
    };

    let item = ItemSacola {
        produto_id: produto.id,
        nome: produto.nome,
        preco: produto.preco,
        quantidade: novo_item.quantidade,
        tamanho: novo_item.tamanho.clone(),
        cor: novo_item.cor.clone(),
        material: produto.material,
        imagem: produto.imagem_url,
    };

    sacola.adicionar_item(usuario.usuario_id, item);

    HttpResponse::Ok().json(GenericResponse::com_corpo(
        "Item adicionado/atualizado na sacola com sucesso!",
        serde_json::json!({ "total_itens": sacola.total_itens(usuario.usuario_id) }),
    ))
}

/// Atualiza a quantidade de uma linha da sacola pela chave composta
/// (`produto|tamanho|cor`). Quantidade zero remove a linha.
#[patch("/sacola/itens/{chave}")]
pub async fn atualizar_item_sacola(
    sacola: web::Data<SacolaStore>,
    usuario: UsuarioAutenticado,
    path: web::Path<String>,
    corpo: web::Json<AtualizarQuantidade>,
) -> HttpResponse {
    let chave = path.into_inner();

    if sacola.atualizar_quantidade(usuario.usuario_id, &chave, corpo.quantidade) {
        HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Sacola atualizada.",
            serde_json::json!({ "total_itens": sacola.total_itens(usuario.usuario_id) }),
        ))
    } else {
        HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Item {} não encontrado na sacola.",
            chave
        )))
    }
}

/// Esvazia a sacola do usuário.
#[delete("/sacola")]
pub async fn limpar_sacola(
    sacola: web::Data<SacolaStore>,
    usuario: UsuarioAutenticado,
) -> HttpResponse {
    sacola.limpar(usuario.usuario_id);
    HttpResponse::Ok().json(GenericResponse::ok("Sacola esvaziada."))
}
