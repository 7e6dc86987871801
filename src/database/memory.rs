use async_trait::async_trait;
use tokio::sync::RwLock;

use super::catalog::TenantCatalog;
use super::filter::TenantFilter;
use super::manager::DatabaseError;
use super::models::{NewTenant, Tenant};

/// Process-local catalog, for tests and single-node development
#[derive(Default)]
pub struct MemoryTenantCatalog {
    inner: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    tenants: Vec<Tenant>,
    last_id: i32,
}

impl MemoryTenantCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed records with fixed ids; later inserts continue after the highest id
    pub fn with_tenants(tenants: impl IntoIterator<Item = Tenant>) -> Self {
        let mut tenants: Vec<Tenant> = tenants.into_iter().collect();
        tenants.sort_by_key(|t| t.id);
        let last_id = tenants.last().map_or(0, |t| t.id);
        Self {
            inner: RwLock::new(MemoryState { tenants, last_id }),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.tenants.len()
    }
}

#[async_trait]
impl TenantCatalog for MemoryTenantCatalog {
    async fn find(&self, filter: &TenantFilter) -> Result<Option<Tenant>, DatabaseError> {
        let state = self.inner.read().await;
        Ok(state.tenants.iter().find(|t| filter.matches(t)).cloned())
    }

    async fn list(&self, filter: &TenantFilter) -> Result<Vec<Tenant>, DatabaseError> {
        let state = self.inner.read().await;
        Ok(state
            .tenants
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn insert(&self, tenant: &NewTenant) -> Result<Tenant, DatabaseError> {
        let mut state = self.inner.write().await;
        state.last_id += 1;
        let tenant = Tenant {
            id: state.last_id,
            name: tenant.name.clone(),
            subdomain: tenant.subdomain.clone(),
            database_name: tenant.database_name().to_string(),
        };
        state.tenants.push(tenant.clone());
        Ok(tenant)
    }

    async fn remove(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut state = self.inner.write().await;
        let before = state.tenants.len();
        state.tenants.retain(|t| t.id != id);
        Ok(state.tenants.len() != before)
    }
}
