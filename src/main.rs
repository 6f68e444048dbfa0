use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfmate::{
    build_app,
    config::{CatalogKind, Config},
    db::{
        self, Cache, CacheWriterHandle, MemorySessions, MemoryStore, PgStore, RedisSessions,
        SessionStore, Store,
    },
    services::{
        catalog::{CatalogSource, LocalCsv, PgCatalog, RemoteCsv},
        Catalog, LinkChecker,
    },
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelfmate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        catalog_source = ?config.catalog_source,
        postgres = config.database_url.is_some(),
        redis = config.redis_url.is_some(),
        "Configuration loaded"
    );

    let db_pool = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url, config.db_max_connections)
                .await
                .context("Failed to connect to PostgreSQL")?;
            db::run_migrations(&pool).await?;
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, records are kept in memory");
            None
        }
    };

    let (cache, cache_handle): (Option<Cache>, Option<CacheWriterHandle>) = match &config.redis_url
    {
        Some(url) => {
            let client = db::create_redis_client(url)?;
            let (cache, handle) = Cache::new(client).await;
            (Some(cache), Some(handle))
        }
        None => {
            tracing::warn!("REDIS_URL not set, login tokens are kept in memory");
            (None, None)
        }
    };

    let store: Arc<dyn Store> = match &db_pool {
        Some(pool) => Arc::new(PgStore::new(pool.clone())),
        None => Arc::new(MemoryStore::new()),
    };

    let sessions: Arc<dyn SessionStore> = match &cache {
        Some(cache) => Arc::new(RedisSessions::new(cache.clone(), config.session_ttl_secs)),
        None => Arc::new(MemorySessions::new(config.session_ttl_secs)),
    };

    let source: Box<dyn CatalogSource> = match config.catalog_source {
        CatalogKind::Remote => Box::new(RemoteCsv::new(config.catalog_location.clone(), cache)),
        CatalogKind::File => Box::new(LocalCsv::new(config.catalog_location.clone())),
        CatalogKind::Postgres => {
            let pool = db_pool
                .clone()
                .context("CATALOG_SOURCE=postgres requires DATABASE_URL")?;
            Box::new(PgCatalog::new(pool))
        }
    };

    let state = Arc::new(AppState {
        store,
        sessions,
        catalog: Arc::new(Catalog::new(source)),
        link_checker: LinkChecker::new()?,
    });

    let app = build_app(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
