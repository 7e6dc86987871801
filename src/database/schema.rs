use async_trait::async_trait;
use sqlx::migrate::MigrateDatabase;
use sqlx::Postgres;
use tracing::info;

use super::manager::{DatabaseError, DatabaseManager};

/// Schema every tenant database is migrated to
pub static TENANT_MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations/tenant");

/// Physical schema operations on a tenant database, addressed by connection string
#[async_trait]
pub trait SchemaManager: Send + Sync {
    /// Create the database if it does not exist; `true` when it was created by this call
    async fn create_database(&self, connection_string: &str) -> Result<bool, DatabaseError>;

    /// Apply all pending migrations to an existing database
    async fn apply_migrations(&self, connection_string: &str) -> Result<(), DatabaseError>;

    /// Drop the database entirely
    async fn drop_database(&self, connection_string: &str) -> Result<(), DatabaseError>;
}

/// Postgres schema operations backed by sqlx's migrator
pub struct PgSchemaManager {
    pools: DatabaseManager,
}

impl PgSchemaManager {
    pub fn new(pools: DatabaseManager) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl SchemaManager for PgSchemaManager {
    async fn create_database(&self, connection_string: &str) -> Result<bool, DatabaseError> {
        if Postgres::database_exists(connection_string).await? {
            return Ok(false);
        }
        Postgres::create_database(connection_string).await?;
        info!("Created tenant database");
        Ok(true)
    }

    async fn apply_migrations(&self, connection_string: &str) -> Result<(), DatabaseError> {
        let pool = self.pools.pool(connection_string).await?;
        TENANT_MIGRATOR.run(&pool).await?;
        info!("Tenant migrations applied");
        Ok(())
    }

    async fn drop_database(&self, connection_string: &str) -> Result<(), DatabaseError> {
        self.pools.evict(connection_string).await;

        if Postgres::database_exists(connection_string).await? {
            Postgres::drop_database(connection_string).await?;
            info!("Dropped tenant database");
        }
        Ok(())
    }
}
