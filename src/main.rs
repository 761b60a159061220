// src/main.rs

use actix_web::{web, App, HttpServer};
use sqlx::{Pool, Postgres};
use tracing_subscriber::EnvFilter;

// Importa os módulos da aplicação
mod banners; // Banners da página inicial
mod categorias; // Categorias do catálogo
mod clientes; // Perfis de cliente
mod cupons; // Cupons de desconto
mod enderecos; // Endereços e consulta de CEP
mod estoque; // Razão de movimentações de estoque
mod fornecedores; // Fornecedores
mod instagram; // Feed do Instagram
mod pagamentos; // Integrações de pagamento e webhook
mod pedidos; // Checkout e pedidos
mod produtos; // Catálogo de produtos
mod sacola; // Sacola de compras em memória
mod shared; // Tipos compartilhados
mod usuarios; // Autenticação e administradores

use pagamentos::pagamentos_client::ClientePagamentos;
use sacola::sacola_structs::SacolaStore;
use usuarios::admin_cache::{novo_cache_admin, CacheAdmin};

/// Estado compartilhado da aplicação.
pub struct AppState {
    pub db_pool: Pool<Postgres>,
    pub jwt_secret: String,
    pub cache_admin: CacheAdmin,
    pub super_admin_email: Option<String>,
    pub http: reqwest::Client,
    pub pagamentos: ClientePagamentos,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Configuração obrigatória: sem banco ou segredo do JWT não há aplicação.
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL precisa estar definida");
    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET precisa estar definida");

    // Integrações opcionais: sem URL/token, ficam desligadas.
    let super_admin_email = std::env::var("SUPER_ADMIN_EMAIL").ok();
    let mercado_pago_url = std::env::var("MERCADO_PAGO_URL")
        .unwrap_or_else(|_| "https://api.mercadopago.com".to_string());
    let mercado_pago_token = std::env::var("MERCADO_PAGO_TOKEN").ok();
    let webhook_pedidos_url = std::env::var("WEBHOOK_PEDIDOS_URL").ok();

    let porta: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    // Conecta ao banco de dados PostgreSQL usando um pool de conexões.
    let db_pool = Pool::<Postgres>::connect(&database_url)
        .await
        .expect("Falha ao conectar ao banco PostgreSQL");

    sqlx::migrate!()
        .run(&db_pool)
        .await
        .expect("Falha ao aplicar as migrações do banco");

    let http = reqwest::Client::new();
    let pagamentos_client = ClientePagamentos::new(
        http.clone(),
        mercado_pago_url,
        mercado_pago_token,
        webhook_pedidos_url,
    );

    let app_state = web::Data::new(AppState {
        db_pool,
        jwt_secret,
        cache_admin: novo_cache_admin(),
        super_admin_email,
        http,
        pagamentos: pagamentos_client,
    });

    // Sacolas em memória, uma por usuário autenticado.
    let sacola_state = web::Data::new(SacolaStore::new());

    tracing::info!("Iniciando API Vitrine na porta {}...", porta);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(sacola_state.clone())
            // Módulo de Usuários e Administradores
            .service(usuarios::usuario_router::cadastrar_usuario)
            .service(usuarios::usuario_router::login_usuario)
            .service(usuarios::usuario_router::listar_usuarios_admin)
            .service(usuarios::usuario_router::cadastrar_usuario_admin)
            .service(usuarios::usuario_router::atualizar_ativo_usuario_admin)
            .service(usuarios::usuario_router::deletar_usuario_admin)
            // Módulo de Produtos
            .service(produtos::produtos_router::buscar_produtos)
            .service(produtos::produtos_router::buscar_produto_por_id)
            .service(produtos::produtos_router::listar_produtos_admin)
            .service(produtos::produtos_router::cadastrar_produto)
            .service(produtos::produtos_router::atualizar_produto)
            .service(produtos::produtos_router::atualizar_ativo_produto)
            .service(produtos::produtos_router::deletar_produto)
            // Módulo de Categorias
            .service(categorias::categoria_router::buscar_categorias)
            .service(categorias::categoria_router::listar_categorias_admin)
            .service(categorias::categoria_router::cadastrar_categoria)
            .service(categorias::categoria_router::atualizar_categoria)
            .service(categorias::categoria_router::atualizar_ativo_categoria)
            .service(categorias::categoria_router::deletar_categoria)
            // Módulo de Clientes
            .service(clientes::cliente_router::listar_clientes)
            .service(clientes::cliente_router::atualizar_ativo_cliente)
            .service(clientes::cliente_router::buscar_perfil)
            .service(clientes::cliente_router::atualizar_perfil)
            // Módulo de Endereços e CEP
            .service(enderecos::endereco_router::consultar_cep)
            .service(enderecos::endereco_router::listar_enderecos)
            .service(enderecos::endereco_router::cadastrar_endereco)
            // Módulo de Fornecedores
            .service(fornecedores::fornecedor_router::listar_fornecedores)
            .service(fornecedores::fornecedor_router::cadastrar_fornecedor)
            .service(fornecedores::fornecedor_router::atualizar_fornecedor)
            .service(fornecedores::fornecedor_router::atualizar_ativo_fornecedor)
            .service(fornecedores::fornecedor_router::deletar_fornecedor)
            // Módulo de Cupons
            .service(cupons::cupom_router::validar_cupom_por_codigo)
            .service(cupons::cupom_router::listar_cupons)
            .service(cupons::cupom_router::cadastrar_cupom)
            .service(cupons::cupom_router::atualizar_cupom)
            .service(cupons::cupom_router::atualizar_ativo_cupom)
            .service(cupons::cupom_router::deletar_cupom)
            // Módulo de Banners
            .service(banners::banner_router::buscar_banners)
            .service(banners::banner_router::listar_banners_admin)
            .service(banners::banner_router::cadastrar_banner)
            .service(banners::banner_router::atualizar_banner)
            .service(banners::banner_router::atualizar_ativo_banner)
            .service(banners::banner_router::deletar_banner)
            // Módulo do Instagram
            .service(instagram::instagram_router::buscar_links_instagram)
            .service(instagram::instagram_router::listar_links_instagram_admin)
            .service(instagram::instagram_router::cadastrar_link_instagram)
            .service(instagram::instagram_router::atualizar_ativo_link_instagram)
            .service(instagram::instagram_router::deletar_link_instagram)
            // Módulo de Estoque
            .service(estoque::estoque_router::listar_movimentacoes)
            .service(estoque::estoque_router::registrar_movimentacao)
            .service(estoque::estoque_router::consultar_saldo)
            // Módulo de Sacola
            .service(sacola::sacola_router::ver_sacola)
            .service(sacola::sacola_router::adicionar_item_sacola)
            .service(sacola::sacola_router::atualizar_item_sacola)
            .service(sacola::sacola_router::limpar_sacola)
            // Módulo de Pedidos e Checkout
            .service(pedidos::pedido_router::finalizar_compra)
            .service(pedidos::pedido_router::listar_meus_pedidos)
            .service(pedidos::pedido_router::listar_pedidos_admin)
            .service(pedidos::pedido_router::buscar_pedido_admin)
            .service(pedidos::pedido_router::atualizar_status_pedido)
            .service(pedidos::pedido_router::cancelar_pedido)
    })
    .bind(("0.0.0.0", porta))?
    .run()
    .await
}
