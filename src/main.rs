use std::sync::Arc;

use anyhow::Context;
use novaprofile_api::config::AppConfig;
use novaprofile_api::database::DatabaseManager;
use novaprofile_api::services::{HrStore, MemoryStore, PgStore};
use novaprofile_api::{app, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = novaprofile_api::config::config().clone();
    tracing::info!("Starting {} in {:?} mode", config.api.app_name, config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let store = open_store(&config)?;
    let port = config.api.port;
    let router = app(AppState::new(store, config));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("NovaProfile API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

/// Fixture mode when NOVA_FIXTURE is set, PostgreSQL otherwise
fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn HrStore>> {
    if let Some(path) = config.database.fixture.as_deref() {
        let store = MemoryStore::load(path).with_context(|| format!("loading fixture {}", path))?;
        tracing::info!("Serving fixture data from {}", path);
        return Ok(Arc::new(store));
    }

    let db = DatabaseManager::connect_lazy(&config.database).context("configuring database pool")?;
    Ok(Arc::new(PgStore::new(db, config.filter.clone())))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
