use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use backoffice_api::config::{AppConfig, StoreBackend};
use backoffice_api::resources::{collections, ResourceRegistry};
use backoffice_api::store::{DocumentStore, MemoryStore, PgStore};
use backoffice_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")))
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting back-office API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; login will fail");
    }

    let store: Arc<dyn DocumentStore> = match config.database.backend {
        StoreBackend::Postgres => {
            let store = PgStore::connect(&config.database).await.context("connecting to PostgreSQL")?;
            store.migrate(collections::ALL).await.context("preparing document schema")?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_addr = config.bind_address();
    let state = AppState::new(store, ResourceRegistry::standard(), config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Back-office API listening on http://{}", bind_addr);
    tracing::info!("   Database API:  /api/*");
    tracing::info!("   Auth API:      /api/auth/*");
    tracing::info!("   Mock APIs:     /api/mock/*");

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
