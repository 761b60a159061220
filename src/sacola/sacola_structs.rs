// src/sacola/sacola_structs.rs

use std::collections::HashMap;
use std::sync::RwLock;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Um item da sacola. A combinação produto + tamanho + cor identifica a
/// linha: o mesmo produto em tamanhos ou cores diferentes ocupa linhas
/// separadas.
#[derive(Deserialize, Serialize, Clone)]
pub struct ItemSacola {
    pub produto_id: i32,
    pub nome: String,
    pub preco: BigDecimal,
    pub quantidade: i32,
    pub tamanho: Option<String>,
    pub cor: Option<String>,
    pub material: Option<String>,
    pub imagem: Option<String>,
}

impl ItemSacola {
    /// Chave composta da linha, no formato `produto|tamanho|cor`.
    pub fn chave(&self) -> String {
        format!(
            "{}|{}|{}",
            self.produto_id,
            self.tamanho.as_deref().unwrap_or("-"),
            self.cor.as_deref().unwrap_or("-"),
        )
    }
}

/// Sacola de um cliente: lista ordenada de itens.
#[derive(Default, Clone, Serialize)]
pub struct Sacola {
    pub itens: Vec<ItemSacola>,
}

/// Guarda as sacolas em memória, uma por usuário autenticado. Por ficar no
/// servidor, a sacola sobrevive a recarregamentos de página e à volta do
/// login sem nenhum passo extra do cliente.
#[derive(Default)]
pub struct SacolaStore {
    sacolas: RwLock<HashMap<i32, Sacola>>,
}

impl SacolaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona um item: se já existir linha com a mesma chave composta, as
    /// quantidades são somadas; senão o item entra no fim da lista.
    pub fn adicionar_item(&self, usuario_id: i32, item: ItemSacola) {
        let mut sacolas = self.sacolas.write().unwrap();
        let sacola = sacolas.entry(usuario_id).or_default();

        let chave = item.chave();
        for existente in sacola.itens.iter_mut() {
            if existente.chave() == chave {
                existente.quantidade += item.quantidade;
                return;
            }
        }
        sacola.itens.push(item);
    }

    /// Atualiza a quantidade da linha identificada pela chave composta.
    /// Quantidade zero remove a linha. Retorna false se a linha não existe.
    pub fn atualizar_quantidade(&self, usuario_id: i32, chave: &str, quantidade: i32) -> bool {
        let mut sacolas = self.sacolas.write().unwrap();
        let Some(sacola) = sacolas.get_mut(&usuario_id) else {
            return false;
        };

        let Some(posicao) = sacola.itens.iter().position(|i| i.chave() == chave) else {
            return false;
        };

        if quantidade <= 0 {
            sacola.itens.remove(posicao);
        } else {
            sacola.itens[posicao].quantidade = quantidade;
        }
        true
    }

    /// Retrato dos itens atuais do usuário.
    pub fn itens(&self, usuario_id: i32) -> Vec<ItemSacola> {
        self.sacolas
            .read()
            .unwrap()
            .get(&usuario_id)
            .map(|s| s.itens.clone())
            .unwrap_or_default()
    }

    /// Soma das quantidades de todas as linhas do usuário.
    pub fn total_itens(&self, usuario_id: i32) -> i32 {
        self.sacolas
            .read()
            .unwrap()
            .get(&usuario_id)
            .map(|s| s.itens.iter().map(|i| i.quantidade).sum())
            .unwrap_or(0)
    }

    pub fn limpar(&self, usuario_id: i32) {
        self.sacolas.write().unwrap().remove(&usuario_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(produto_id: i32, tamanho: &str, cor: &str, quantidade: i32) -> ItemSacola {
        ItemSacola {
            produto_id,
            nome: format!("Produto {}", produto_id),
            preco: BigDecimal::from(50),
            quantidade,
            tamanho: Some(tamanho.to_string()),
            cor: Some(cor.to_string()),
            material: None,
            imagem: None,
        }
    }

    #[test]
    fn mesma_chave_soma_quantidades() {
        let store = SacolaStore::new();
        store.adicionar_item(1, item(1, "M", "preto", 2));
        store.adicionar_item(1, item(1, "M", "preto", 1));

        let itens = store.itens(1);
        assert_eq!(itens.len(), 1);
        assert_eq!(itens[0].quantidade, 3);
        assert_eq!(itens[0].chave(), "1|M|preto");
    }

    #[test]
    fn tamanho_ou_cor_diferente_cria_linha_nova() {
        let store = SacolaStore::new();
        store.adicionar_item(1, item(1, "M", "preto", 1));
        store.adicionar_item(1, item(1, "G", "preto", 1));
        store.adicionar_item(1, item(1, "M", "branco", 1));

        assert_eq!(store.itens(1).len(), 3);
        assert_eq!(store.total_itens(1), 3);
    }

    #[test]
    fn quantidade_zero_remove_a_linha() {
        let store = SacolaStore::new();
        store.adicionar_item(1, item(1, "M", "preto", 2));
        store.adicionar_item(1, item(2, "U", "azul", 1));

        assert!(store.atualizar_quantidade(1, "1|M|preto", 0));
        let itens = store.itens(1);
        assert_eq!(itens.len(), 1);
        assert_eq!(itens[0].produto_id, 2);
    }

    #[test]
    fn atualizar_linha_inexistente_retorna_false() {
        let store = SacolaStore::new();
        store.adicionar_item(1, item(1, "M", "preto", 2));
        assert!(!store.atualizar_quantidade(1, "9|M|preto", 1));
        assert!(!store.atualizar_quantidade(2, "1|M|preto", 1));
    }

    #[test]
    fn sacolas_sao_por_usuario() {
        let store = SacolaStore::new();
        store.adicionar_item(1, item(1, "M", "preto", 2));
        store.adicionar_item(2, item(1, "M", "preto", 5));

        assert_eq!(store.total_itens(1), 2);
        assert_eq!(store.total_itens(2), 5);

        store.limpar(1);
        assert_eq!(store.total_itens(1), 0);
        assert_eq!(store.total_itens(2), 5);
    }

    #[test]
    fn item_sem_variante_usa_tracos_na_chave() {
        let mut i = item(7, "M", "preto", 1);
        i.tamanho = None;
        i.cor = None;
        assert_eq!(i.chave(), "7|-|-");
    }
}
