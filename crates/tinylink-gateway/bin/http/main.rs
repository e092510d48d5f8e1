mod cli;
mod logging;

use crate::cli::{CacheBackendArg, StorageBackendArg, CLI};
use clap::Parser;
use std::sync::Arc;
use tinylink_cache::{MokaCacheConfig, MokaLinkCache, RedisLinkCache};
use tinylink_core::{LinkCache, LinkStore};
use tinylink_gateway::{App, AppState};
use tinylink_shortener::LinkService;
use tinylink_storage::{InMemoryLinkStore, PostgresLinkStore};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let config = CLI::parse();
    logging::init(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        domain = %config.domain,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        retry_policy = %config.retry_policy,
        max_retries = config.max_retries,
        "starting tinylink gateway"
    );

    let store = build_store(&config).await?;
    let cache = build_cache(&config).await?;
    let service = LinkService::with_random_generator(store, cache, config.service_config())?;
    let state = AppState::new(Arc::new(service), config.max_retries);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn build_store(config: &CLI) -> Result<Arc<dyn LinkStore>, Box<dyn std::error::Error>> {
    match config.storage {
        StorageBackendArg::InMemory => Ok(Arc::new(InMemoryLinkStore::new())),
        StorageBackendArg::Postgres => {
            let dsn = config
                .postgres_dsn
                .as_deref()
                .ok_or("postgres dsn is required when storage backend is postgres")?;
            let store = PostgresLinkStore::connect_with_table(dsn, &config.postgres_table).await?;
            Ok(Arc::new(store))
        }
    }
}

async fn build_cache(
    config: &CLI,
) -> Result<Option<Arc<dyn LinkCache>>, Box<dyn std::error::Error>> {
    match config.cache {
        CacheBackendArg::None => Ok(None),
        CacheBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .ok_or("redis url is required when cache backend is redis")?;
            let cache = RedisLinkCache::connect(redis_url)
                .await?
                .with_ttl(config.cache_ttl());
            Ok(Some(Arc::new(cache)))
        }
        CacheBackendArg::Moka => {
            let cache: MokaLinkCache = match config.cache_ttl() {
                Some(ttl) => MokaCacheConfig::builder()
                    .max_capacity(config.cache_capacity)
                    .ttl(ttl)
                    .build()
                    .into(),
                None => MokaLinkCache::with_capacity(config.cache_capacity),
            };
            Ok(Some(Arc::new(cache)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
