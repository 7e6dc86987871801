use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::filter::TenantFilter;
use super::manager::DatabaseError;
use super::models::{NewTenant, Tenant};

/// Catalog migrations, applied to the shared catalog database at startup
pub static CATALOG_MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations/catalog");

const TENANT_COLUMNS: &str = "id, name, subdomain, database_name";

/// Anything that can store and query tenant records.
///
/// The resolution middleware and the lifecycle service only talk to the
/// catalog through this trait.
#[async_trait]
pub trait TenantCatalog: Send + Sync {
    /// First tenant (lowest id) matching `filter`
    async fn find(&self, filter: &TenantFilter) -> Result<Option<Tenant>, DatabaseError>;

    /// All tenants matching `filter`, ordered by id
    async fn list(&self, filter: &TenantFilter) -> Result<Vec<Tenant>, DatabaseError>;

    /// Persist a normalized tenant and return it with its assigned id
    async fn insert(&self, tenant: &NewTenant) -> Result<Tenant, DatabaseError>;

    /// Remove a tenant by id; returns whether a row was removed
    async fn remove(&self, id: i32) -> Result<bool, DatabaseError>;

    /// Connectivity check used by `/health`
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

/// Catalog stored in the `tenants` table of the shared catalog database
#[derive(Clone)]
pub struct PgTenantCatalog {
    pool: PgPool,
}

impl PgTenantCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bring the catalog schema up to date
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        CATALOG_MIGRATOR.run(&self.pool).await?;
        info!("Catalog migrations applied");
        Ok(())
    }

    fn select<'a>(filter: &'a TenantFilter) -> QueryBuilder<'a, Postgres> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM tenants", TENANT_COLUMNS));
        filter.push_where(&mut builder);
        builder.push(" ORDER BY id");
        builder
    }
}

#[async_trait]
impl TenantCatalog for PgTenantCatalog {
    async fn find(&self, filter: &TenantFilter) -> Result<Option<Tenant>, DatabaseError> {
        let mut builder = Self::select(filter);
        builder.push(" LIMIT 1");
        let tenant = builder
            .build_query_as::<Tenant>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(tenant)
    }

    async fn list(&self, filter: &TenantFilter) -> Result<Vec<Tenant>, DatabaseError> {
        let mut builder = Self::select(filter);
        let tenants = builder
            .build_query_as::<Tenant>()
            .fetch_all(&self.pool)
            .await?;
        Ok(tenants)
    }

    async fn insert(&self, tenant: &NewTenant) -> Result<Tenant, DatabaseError> {
        let query = format!(
            "INSERT INTO tenants (name, subdomain, database_name) VALUES ($1, $2, $3) RETURNING {}",
            TENANT_COLUMNS
        );
        let tenant = sqlx::query_as::<_, Tenant>(&query)
            .bind(&tenant.name)
            .bind(&tenant.subdomain)
            .bind(tenant.database_name())
            .fetch_one(&self.pool)
            .await?;
        Ok(tenant)
    }

    async fn remove(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
