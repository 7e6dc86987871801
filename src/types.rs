//! Shared types used across the codebase

use serde::Serialize;

use crate::database::models::Tenant;

/// Tenant resolved for the current request.
///
/// Written into the request extensions by the resolution middleware and read
/// by the data context binding of the same request. It lives and dies with
/// the request; nothing keeps it beyond that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTenant {
    pub database_name: String,
    pub tenant: Tenant,
}

impl From<Tenant> for ResolvedTenant {
    fn from(tenant: Tenant) -> Self {
        Self {
            database_name: tenant.database_name.clone(),
            tenant,
        }
    }
}
