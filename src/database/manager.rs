use sqlx::{postgres::PgPoolOptions, PgPool};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid connection template: {0}")]
    InvalidTemplate(String),

    #[error("Invalid tenant database name: {0}")]
    InvalidDatabaseName(String),

    #[error("No tenant has been resolved for this data context")]
    NoTenant,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationError(err.to_string())
    }
}

/// Connection pool cache shared by the catalog and every tenant data context.
///
/// Pools are keyed by their full connection string so two tenants can never
/// share a pool.
#[derive(Clone)]
pub struct DatabaseManager {
    pools: Arc<RwLock<HashMap<String, PgPool>>>,
    max_connections: u32,
    connection_timeout: Duration,
}

impl DatabaseManager {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            pools: Arc::new(RwLock::new(HashMap::new())),
            max_connections: config.max_connections,
            connection_timeout: Duration::from_secs(config.connection_timeout),
        }
    }

    /// Get existing pool or create a new one lazily
    pub async fn pool(&self, connection_string: &str) -> Result<PgPool, DatabaseError> {
        if connection_string.trim().is_empty() {
            return Err(DatabaseError::ConnectionError(
                "empty connection string".to_string(),
            ));
        }

        // Fast path: try read lock
        {
            let pools = self.pools.read().await;
            if let Some(pool) = pools.get(connection_string) {
                return Ok(pool.clone());
            }
        }

        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connection_timeout)
            .connect(connection_string)
            .await?;

        // Another task may have raced us here; keep whichever pool landed first
        let mut pools = self.pools.write().await;
        let pool = pools
            .entry(connection_string.to_string())
            .or_insert(pool)
            .clone();

        info!("Created database pool ({} cached)", pools.len());
        Ok(pool)
    }

    /// Close and forget the pool for a connection string, if any.
    /// Needed before dropping a database, Postgres refuses while sessions are open.
    pub async fn evict(&self, connection_string: &str) {
        let removed = self.pools.write().await.remove(connection_string);
        if let Some(pool) = removed {
            pool.close().await;
            info!("Closed database pool after eviction");
        }
    }

    /// Pings the given database to ensure connectivity
    pub async fn health_check(&self, connection_string: &str) -> Result<(), DatabaseError> {
        let pool = self.pool(connection_string).await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close and remove all pools (e.g., on shutdown)
    pub async fn close_all(&self) {
        let mut pools = self.pools.write().await;
        let count = pools.len();
        for (_, pool) in pools.drain() {
            pool.close().await;
        }
        info!("Closed {} database pools", count);
    }

    pub async fn cached_pools(&self) -> usize {
        self.pools.read().await.len()
    }
}
