// src/produtos/produtos_router.rs

use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::query_as;

use super::produtos_structs::{
    DetalheProduto, FiltroProdutos, ImagemProduto, NovoProduto, ProdutoComCategoria,
    VarianteProduto,
};
use crate::shared::shared_structs::{erro_interno, AtualizarAtivo, GenericResponse};
use crate::usuarios::auth_middleware::Admin;
use crate::AppState;

const COLUNAS_COM_CATEGORIA: &str = "p.id, p.nome, p.descricao, p.preco, p.categoria_id, \
     c.nome AS categoria_nome, p.material, p.imagem_url, p.ativo, p.criado_em, p.atualizado_em";

/// Rota pública: lista os produtos ativos da vitrine, com filtro opcional de
/// busca textual e de categoria.
#[get("/produtos")]
pub async fn buscar_produtos(
    data: web::Data<AppState>,
    filtro: web::Query<FiltroProdutos>,
) -> impl Responder {
    let sql = format!(
        "SELECT {} FROM produtos p \
         LEFT JOIN categorias c ON c.id = p.categoria_id \
         WHERE p.ativo = TRUE \
           AND ($1::TEXT IS NULL OR p.nome ILIKE '%' || $1 || '%') \
           AND ($2::INTEGER IS NULL OR p.categoria_id = $2) \
         ORDER BY p.criado_em DESC",
        COLUNAS_COM_CATEGORIA
    );

    let produtos_result = query_as::<_, ProdutoComCategoria>(&sql)
        .bind(&filtro.busca)
        .bind(filtro.categoria_id)
        .fetch_all(&data.db_pool)
        .await;

    match produtos_result {
        Ok(produtos) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Produtos listados com sucesso!",
            produtos,
        )),
        Err(e) => erro_interno("Erro ao buscar produtos", e),
    }
}

/// Rota pública: detalhe de um produto com variações e galeria de imagens.
#[get("/produtos/{id}")]
pub async fn buscar_produto_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> impl Responder {
    let id = path.into_inner();

    let sql = format!(
        "SELECT {} FROM produtos p \
         LEFT JOIN categorias c ON c.id = p.categoria_id \
         WHERE p.id = $1 AND p.ativo = TRUE",
        COLUNAS_COM_CATEGORIA
    );

    let produto = match query_as::<_, ProdutoComCategoria>(&sql)
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await
    {
        Ok(Some(p)) => p,
        Ok(None) => {
            return HttpResponse::NotFound().json(GenericResponse::erro(format!(
                "Produto com ID {} não encontrado.",
                id
            )));
        }
        Err(e) => return erro_interno("Erro ao buscar produto", e),
    };

    let variantes = match query_as::<_, VarianteProduto>(
        "SELECT id, produto_id, tamanho, cor FROM variantes_produto WHERE produto_id = $1 ORDER BY id",
    )
    .bind(id)
    .fetch_all(&data.db_pool)
    .await
    {
        Ok(v) => v,
        Err(e) => return erro_interno("Erro ao buscar variações do produto", e),
    };

    let imagens = match query_as::<_, ImagemProduto>(
        "SELECT id, produto_id, url, posicao FROM imagens_produto \
         WHERE produto_id = $1 ORDER BY posicao, id",
    )
    .bind(id)
    .fetch_all(&data.db_pool)
    .await
    {
        Ok(i) => i,
        Err(e) => return erro_interno("Erro ao buscar imagens do produto", e),
    };

    HttpResponse::Ok().json(GenericResponse::com_corpo(
        "Produto encontrado.",
        DetalheProduto {
            produto,
            variantes,
            imagens,
        },
    ))
}

/// Painel: lista todos os produtos, inclusive inativos.
#[get("/admin/produtos")]
pub async fn listar_produtos_admin(data: web::Data<AppState>, _admin: Admin) -> impl Responder {
    let sql = format!(
        "SELECT {} FROM produtos p \
         LEFT JOIN categorias c ON c.id = p.categoria_id \
         ORDER BY p.criado_em DESC",
        COLUNAS_COM_CATEGORIA
    );

    match query_as::<_, ProdutoComCategoria>(&sql)
        .fetch_all(&data.db_pool)
        .await
    {
        Ok(produtos) => HttpResponse::Ok().json(GenericResponse::com_corpo(
            "Produtos listados com sucesso!",
            produtos,
        )),
        Err(e) => erro_interno("Erro ao listar produtos do painel", e),
    }
}

/// Rota para inserir um novo produto, com variações e galeria na mesma
/// transação.
#[post("/admin/produtos")]
pub async fn cadastrar_produto(
    data: web::Data<AppState>,
    _admin: Admin,
    item: web::Json<NovoProduto>,
) -> HttpResponse {
    let mut tx = match data.db_pool.begin().await {
        Ok(tx) => tx,
        Err(e) => return erro_interno("Erro ao iniciar transação de produto", e),
    };

    let produto_id = match sqlx::query_scalar::<_, i32>(
        "INSERT INTO produtos (nome, descricao, preco, categoria_id, material, imagem_url) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&item.nome)
    .bind(&item.descricao)
    .bind(&item.preco)
    .bind(item.categoria_id)
    .bind(&item.material)
    .bind(&item.imagem_url)
    .fetch_one(&mut tx)
    .await
    {
        Ok(id) => id,
        Err(e) => return erro_interno("Erro ao inserir produto", e),
    };

    for variante in &item.variantes {
        if let Err(e) = sqlx::query(
            "INSERT INTO variantes_produto (produto_id, tamanho, cor) VALUES ($1, $2, $3)",
        )
        .bind(produto_id)
        .bind(&variante.tamanho)
        .bind(&variante.cor)
        .execute(&mut tx)
        .await
        {
            return erro_interno("Erro ao inserir variação do produto", e);
        }
    }

    for (posicao, url) in item.imagens.iter().enumerate() {
        if let Err(e) = sqlx::query(
            "INSERT INTO imagens_produto (produto_id, url, posicao) VALUES ($1, $2, $3)",
        )
        .bind(produto_id)
        .bind(url)
        .bind(posicao as i32)
        .execute(&mut tx)
        .await
        {
            return erro_interno("Erro ao inserir imagem do produto", e);
        }
    }

    if let Err(e) = tx.commit().await {
        return erro_interno("Erro ao concluir cadastro do produto", e);
    }

    HttpResponse::Ok().json(GenericResponse::com_corpo(
        "Produto cadastrado com sucesso!",
        serde_json::json!({ "id": produto_id }),
    ))
}

/// Atualiza os dados principais de um produto. As variações são substituídas
/// pelas enviadas no corpo.
#[put("/admin/produtos/{id}")]
pub async fn atualizar_produto(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    item: web::Json<NovoProduto>,
) -> HttpResponse {
    let id = path.into_inner();

    let mut tx = match data.db_pool.begin().await {
        Ok(tx) => tx,
        Err(e) => return erro_interno("Erro ao iniciar transação de produto", e),
    };

    let atualizado = sqlx::query(
        "UPDATE produtos SET nome = $1, descricao = $2, preco = $3, categoria_id = $4, \
         material = $5, imagem_url = $6, atualizado_em = NOW() WHERE id = $7",
    )
    .bind(&item.nome)
    .bind(&item.descricao)
    .bind(&item.preco)
    .bind(item.categoria_id)
    .bind(&item.material)
    .bind(&item.imagem_url)
    .bind(id)
    .execute(&mut tx)
    .await;

    match atualizado {
        Ok(r) if r.rows_affected() == 0 => {
            return HttpResponse::NotFound().json(GenericResponse::erro(format!(
                "Produto com ID {} não encontrado.",
                id
            )));
        }
        Ok(_) => {}
        Err(e) => return erro_interno("Erro ao atualizar produto", e),
    }

    if let Err(e) = sqlx::query("DELETE FROM variantes_produto WHERE produto_id = $1")
        .bind(id)
        .execute(&mut tx)
        .await
    {
        return erro_interno("Erro ao substituir variações do produto", e);
    }

    for variante in &item.variantes {
        if let Err(e) = sqlx::query(
            "INSERT INTO variantes_produto (produto_id, tamanho, cor) VALUES ($1, $2, $3)",
        )
        .bind(id)
        .bind(&variante.tamanho)
        .bind(&variante.cor)
        .execute(&mut tx)
        .await
        {
            return erro_interno("Erro ao inserir variação do produto", e);
        }
    }

    if let Err(e) = tx.commit().await {
        return erro_interno("Erro ao concluir atualização do produto", e);
    }

    HttpResponse::Ok().json(GenericResponse::ok("Produto atualizado com sucesso!"))
}

/// Ativa/desativa um produto na vitrine.
#[patch("/admin/produtos/{id}/ativo")]
pub async fn atualizar_ativo_produto(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
    corpo: web::Json<AtualizarAtivo>,
) -> HttpResponse {
    let id = path.into_inner();
    let resultado =
        sqlx::query("UPDATE produtos SET ativo = $1, atualizado_em = NOW() WHERE id = $2")
            .bind(corpo.ativo)
            .bind(id)
            .execute(&data.db_pool)
            .await;

    match resultado {
        Ok(r) if r.rows_affected() > 0 => {
            HttpResponse::Ok().json(GenericResponse::ok("Produto atualizado."))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Produto com ID {} não encontrado.",
            id
        ))),
        Err(e) => erro_interno("Erro ao atualizar produto", e),
    }
}

/// Exclui um produto e seus dependentes (variações, avaliações, favoritos e
/// imagens) em uma única transação.
///
/// A exclusão é recusada quando existe item de pedido referenciando o
/// produto: pedidos antigos guardam o retrato do item, e o catálogo não pode
/// apagar a origem enquanto houver referência.
#[delete("/admin/produtos/{id}")]
pub async fn deletar_produto(
    data: web::Data<AppState>,
    _admin: Admin,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();

    // Pré-condição: nenhum pedido pode referenciar o produto.
    let referencias = match sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM itens_pedido WHERE produto_id = $1",
    )
    .bind(id)
    .fetch_one(&data.db_pool)
    .await
    {
        Ok(n) => n,
        Err(e) => return erro_interno("Erro ao verificar pedidos do produto", e),
    };

    if referencias > 0 {
        return HttpResponse::Conflict().json(GenericResponse::erro(format!(
            "Produto com ID {} já aparece em {} pedido(s) e não pode ser excluído. \
             Desative-o para retirá-lo da vitrine.",
            id, referencias
        )));
    }

    let mut tx = match data.db_pool.begin().await {
        Ok(tx) => tx,
        Err(e) => return erro_interno("Erro ao iniciar transação de exclusão", e),
    };

    for sql in [
        "DELETE FROM favoritos WHERE produto_id = $1",
        "DELETE FROM avaliacoes WHERE produto_id = $1",
        "DELETE FROM variantes_produto WHERE produto_id = $1",
        "DELETE FROM imagens_produto WHERE produto_id = $1",
    ] {
        if let Err(e) = sqlx::query(sql).bind(id).execute(&mut tx).await {
            return erro_interno("Erro ao excluir dependentes do produto", e);
        }
    }

    let removido = sqlx::query("DELETE FROM produtos WHERE id = $1")
        .bind(id)
        .execute(&mut tx)
        .await;

    match removido {
        Ok(r) if r.rows_affected() == 0 => {
            return HttpResponse::NotFound().json(GenericResponse::erro(format!(
                "Produto com ID {} não encontrado.",
                id
            )));
        }
        Ok(_) => {}
        Err(e) => return erro_interno("Erro ao excluir produto", e),
    }

    if let Err(e) = tx.commit().await {
        return erro_interno("Erro ao concluir exclusão do produto", e);
    }

    HttpResponse::Ok().json(GenericResponse::ok("Produto excluído com sucesso!"))
}
