use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use tenantry::config::AppConfig;
use tenantry::database::{DatabaseManager, PgSchemaManager, PgTenantCatalog};
use tenantry::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up CATALOG_DATABASE_URL, TENANT_CONNECTION_TEMPLATE, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = tenantry::config::config().clone();
    tracing::info!("Starting tenantry in {:?} mode", config.environment);

    let state = build_state(config).await?;
    let port = state.config.api.port;
    let pools = state.contexts.pools().clone();

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("tenantry listening on http://{}", bind_addr);

    axum::serve(listener, tenantry::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pools.close_all().await;
    Ok(())
}

async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    if config.tenancy.connection_template.is_none() {
        tracing::warn!("TENANT_CONNECTION_TEMPLATE is not set; tenant requests will fail");
    }

    let catalog_url = config
        .database
        .catalog_url
        .clone()
        .context("CATALOG_DATABASE_URL (or DATABASE_URL) must be set")?;

    let pools = DatabaseManager::new(&config.database);
    let catalog = PgTenantCatalog::new(pools.pool(&catalog_url).await?);
    catalog.migrate().await?;

    let schema = Arc::new(PgSchemaManager::new(pools.clone()));
    Ok(AppState::new(config, Arc::new(catalog), pools, schema))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
