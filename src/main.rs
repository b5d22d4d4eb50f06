use std::sync::Arc;

use anyhow::Context;

use show_catalog::api::{self, AppState};
use show_catalog::config::AppConfig;
use show_catalog::database::{schema, CatalogStore, MemoryStore, PgStore};
use show_catalog::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL
    dotenvy::dotenv().ok();
    logging::init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Show Catalog in {:?} mode", config.environment);

    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend(), "Catalog store ready");

    let bind_addr = config.bind_addr();
    let app = api::app(AppState::new(store.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Show Catalog listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped accepting connections, closing store");
    store.close().await;
    Ok(())
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn CatalogStore>> {
    if config.database.in_memory {
        tracing::warn!("Serving from the in-memory store; data is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    store.health_check().await.context("database health check failed")?;

    if config.database.run_migrations {
        schema::ensure_schema(store.pool()).await.context("failed to create schema")?;
        tracing::info!("Database schema ensured");
    }

    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
