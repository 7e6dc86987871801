use std::sync::Arc;

use tracing::{error, info, warn};

use crate::database::catalog::TenantCatalog;
use crate::database::context::{DbContextFactory, TenantDbContext};
use crate::database::filter::TenantFilter;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewTenant, Tenant};

#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("Invalid tenant {0}: {1}")]
    InvalidField(&'static str, String),
    #[error("Tenant not found: {0}")]
    NotFound(String),
    #[error("Tenant already exists: {0}")]
    AlreadyExists(String),
    #[error("Provisioning of tenant database '{database_name}' failed: {source}")]
    Provisioning {
        database_name: String,
        #[source]
        source: DatabaseError,
    },
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Tenant lifecycle: catalog bookkeeping plus the physical tenant database
#[derive(Clone)]
pub struct TenantService {
    catalog: Arc<dyn TenantCatalog>,
    contexts: DbContextFactory,
}

impl TenantService {
    pub fn new(catalog: Arc<dyn TenantCatalog>, contexts: DbContextFactory) -> Self {
        Self { catalog, contexts }
    }

    /// First tenant matching the filter
    pub async fn find(&self, filter: &TenantFilter) -> Result<Option<Tenant>, TenantError> {
        Ok(self.catalog.find(filter).await?)
    }

    /// Like `find`, but a miss is a `NotFound` error
    pub async fn get(&self, filter: &TenantFilter) -> Result<Tenant, TenantError> {
        self.find(filter)
            .await?
            .ok_or_else(|| TenantError::NotFound(filter.to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Tenant>, TenantError> {
        Ok(self.catalog.list(&TenantFilter::all()).await?)
    }

    /// Register a tenant and provision its database.
    ///
    /// The catalog row is written first. If the database cannot be created or
    /// migrated the row is removed again, a database created by this call is
    /// dropped, and `Provisioning` is returned.
    pub async fn create(&self, tenant: NewTenant) -> Result<Tenant, TenantError> {
        let tenant = tenant.normalize()?;
        let database_name = tenant.database_name().to_string();

        if self
            .catalog
            .find(&TenantFilter::by_database_name(&database_name))
            .await?
            .is_some()
        {
            return Err(TenantError::AlreadyExists(database_name));
        }

        // Resolve the connection string up front so a missing template
        // fails before the catalog is touched
        let mut context = self.contexts.unbound().bind(None)?;
        context.repoint(&database_name)?;

        let created = self
            .catalog
            .insert(&tenant)
            .await
            .map_err(|e| unique_violation_as_exists(e, &database_name))?;
        info!("Registered tenant {} ({}) as id {}", created.name, database_name, created.id);

        let mut database_created = false;
        let provisioned = match context.create_database().await {
            Ok(created_now) => {
                database_created = created_now;
                context.migrate().await
            }
            Err(e) => Err(e),
        };

        if let Err(source) = provisioned {
            warn!(
                "Provisioning tenant database '{}' failed, removing catalog entry {}: {}",
                database_name, created.id, source
            );
            self.compensate(&context, created.id, database_created).await;
            return Err(TenantError::Provisioning {
                database_name,
                source,
            });
        }

        info!("Provisioned tenant database {}", database_name);
        Ok(created)
    }

    /// Undo a partial create: the catalog row, and the database if it is ours
    async fn compensate(&self, context: &TenantDbContext, id: i32, database_created: bool) {
        if let Err(rollback) = self.catalog.remove(id).await {
            error!(
                "Failed to remove catalog entry {} after provisioning failure: {}",
                id, rollback
            );
        }

        // A database that existed before this call is left alone
        if !database_created {
            return;
        }
        if let Err(rollback) = context.drop_database().await {
            error!(
                "Tenant database '{}' created for catalog entry {} could not be dropped: {}",
                context.database_name().unwrap_or_default(),
                id,
                rollback
            );
        }
    }

    /// Remove a tenant from the catalog, then drop its database.
    ///
    /// A failed drop leaves the database orphaned; it is logged and returned
    /// as `Provisioning`, the catalog entry is already gone at that point.
    pub async fn delete(&self, filter: &TenantFilter) -> Result<Tenant, TenantError> {
        let tenant = self.get(filter).await?;

        let mut context = self.contexts.unbound().bind(None)?;
        context.repoint(&tenant.database_name)?;

        if !self.catalog.remove(tenant.id).await? {
            // Somebody else deleted it between lookup and removal
            return Err(TenantError::NotFound(filter.to_string()));
        }
        info!("Removed tenant {} (id {}) from catalog", tenant.name, tenant.id);

        if let Err(source) = context.drop_database().await {
            error!(
                "Tenant {} removed from catalog but database '{}' could not be dropped: {}",
                tenant.id, tenant.database_name, source
            );
            return Err(TenantError::Provisioning {
                database_name: tenant.database_name,
                source,
            });
        }

        info!("Dropped tenant database {}", tenant.database_name);
        Ok(tenant)
    }
}

fn unique_violation_as_exists(err: DatabaseError, database_name: &str) -> TenantError {
    match &err {
        DatabaseError::Sqlx(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            TenantError::AlreadyExists(database_name.to_string())
        }
        _ => TenantError::Database(err),
    }
}
