// src/produtos/produtos_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura que representa um produto no banco de dados.
#[derive(Serialize, FromRow)]
pub struct Produto {
    pub id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: BigDecimal,
    pub categoria_id: Option<i32>,
    pub material: Option<String>,
    pub imagem_url: Option<String>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Produto com o nome da categoria já resolvido (LEFT JOIN), como as
/// listagens da loja e do painel exibem.
#[derive(Serialize, FromRow)]
pub struct ProdutoComCategoria {
    pub id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: BigDecimal,
    pub categoria_id: Option<i32>,
    pub categoria_nome: Option<String>,
    pub material: Option<String>,
    pub imagem_url: Option<String>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Variação de um produto (tamanho/cor).
#[derive(Serialize, FromRow)]
pub struct VarianteProduto {
    pub id: i32,
    pub produto_id: i32,
    pub tamanho: Option<String>,
    pub cor: Option<String>,
}

/// Imagem adicional de um produto.
#[derive(Serialize, FromRow)]
pub struct ImagemProduto {
    pub id: i32,
    pub produto_id: i32,
    pub url: String,
    pub posicao: i32,
}

/// Estrutura para receber dados do novo produto na requisição POST.
#[derive(Deserialize)]
pub struct NovoProduto {
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: BigDecimal,
    pub categoria_id: Option<i32>,
    pub material: Option<String>,
    pub imagem_url: Option<String>,
    #[serde(default)]
    pub variantes: Vec<NovaVariante>,
    #[serde(default)]
    pub imagens: Vec<String>,
}

#[derive(Deserialize)]
pub struct NovaVariante {
    pub tamanho: Option<String>,
    pub cor: Option<String>,
}

/// Detalhe público de um produto: dados, variações e galeria.
#[derive(Serialize)]
pub struct DetalheProduto {
    pub produto: ProdutoComCategoria,
    pub variantes: Vec<VarianteProduto>,
    pub imagens: Vec<ImagemProduto>,
}

/// Filtros da listagem pública (busca textual e categoria).
#[derive(Deserialize)]
pub struct FiltroProdutos {
    pub busca: Option<String>,
    pub categoria_id: Option<i32>,
}
