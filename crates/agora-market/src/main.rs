//! Agora Market binary.
//!
//! Loads the cache configuration, seeds an in-memory marketplace and runs a
//! short scenario through the cache, then prints the cache metrics.
//!
//! Usage: `agora-market [config.toml]`

use std::path::PathBuf;

use agora_cache::{CacheAsideStore, CacheConfig, register_cache_metrics};
use agora_market::{CommentInput, Marketplace, NewUser, PostInput, PrimaryStore, ProductInput};
use anyhow::Context;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Inicializa el sistema de metricas y retorna el handle para el snapshot.
fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets(&[0.00001, 0.0001, 0.001, 0.01, 0.1, 1.0])
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install metrics recorder")?;
    register_cache_metrics();
    Ok(handle)
}

fn seed() -> anyhow::Result<(Vec<NewUser>, Vec<ProductInput>, Vec<PostInput>)> {
    let users = serde_json::from_value(serde_json::json!([
        {"_id": "uidalice", "email": "Alice@Campus.edu", "firstname": "alice", "lastname": "o'neil"},
        {"_id": "uidbob", "email": "bob@campus.edu", "firstname": "Bob", "lastname": "Ruiz"}
    ]))?;
    let products = serde_json::from_value(serde_json::json!([
        {"name": "Desk lamp", "price": 15.5, "description": "Warm light, barely used",
         "condition": "Like New", "seller_id": "uidalice", "category": "furniture"},
        {"name": "Calculus textbook", "price": 40, "description": "8th edition",
         "condition": "good", "seller_id": "uidbob", "category": "books",
         "image": "https://bucket.s3.amazonaws.com/calculus.png"}
    ]))?;
    let posts = serde_json::from_value(serde_json::json!([
        {"buyer_id": "uidbob", "item": "Graphing calculator", "category": "electronics",
         "price": 35, "condition": "fair", "description": "TI-84 or similar"}
    ]))?;
    Ok((users, products, posts))
}

async fn run_scenario(market: &Marketplace) -> anyhow::Result<()> {
    let (users, products, posts) = seed()?;
    for user in users {
        market.add_user(user).await?;
    }
    for product in products {
        market.add_product(product).await?;
    }
    for post in posts {
        market.add_post(post).await?;
    }

    let listed = market.products().await?;
    tracing::info!(count = listed.len(), "Products listed");
    let listed_again = market.products().await?;
    tracing::info!(count = listed_again.len(), "Products listed from cache");

    let lamp = market.search_products_by_name("lamp").await?;
    if let Some(lamp) = lamp.first() {
        let lamp = market.product_by_id(lamp.id.as_str()).await?;
        market.add_favorite("uidbob", lamp.id.as_str()).await?;
        market.remove_product(lamp.id.as_str()).await?;
        tracing::info!(
            remaining = market.products().await?.len(),
            "Product removed"
        );
    }

    market
        .add_comment(CommentInput {
            user_id: "uidalice".to_string(),
            comment_id: "uidbob".to_string(),
            rating: 5,
            comment: Some("Smooth pickup".to_string()),
        })
        .await?;
    tracing::info!(rating = ?market.user_rating("uidalice").await?, "Seller rated");

    let chat = market
        .add_chat(vec!["uidalice".to_string(), "uidbob".to_string()])
        .await?;
    market
        .add_message(chat.id.as_str(), "uidbob", "Is the textbook still available?")
        .await?;

    let metrics = market.cache().metrics();
    tracing::info!(
        hits = metrics.hits(),
        misses = metrics.misses(),
        hit_rate = metrics.hit_rate(),
        "Scenario finished"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = CacheConfig::load(config_path.as_deref()).context("failed to load configuration")?;

    tracing::info!("Starting Agora Market v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        backend = ?config.backend,
        default_ttl_secs = config.default_ttl_seconds,
        "Cache configuration loaded"
    );

    let handle = init_metrics()?;
    let backend = config.build_backend().await?;
    backend
        .health_check()
        .await
        .context("cache backend is not reachable")?;

    let market = Marketplace::new(PrimaryStore::in_memory(), CacheAsideStore::new(backend, &config));
    run_scenario(&market).await?;

    println!("{}", handle.render());
    Ok(())
}
