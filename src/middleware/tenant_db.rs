use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::database::context::{DbContextFactory, TenantDbContext};
use crate::error::ApiError;
use crate::types::ResolvedTenant;

/// Data context bound to the tenant resolved for this request.
///
/// Extracting it is the explicit initialization step of the data context: it
/// reads what `resolve_tenant_middleware` stored and binds a fresh context to
/// it. Requests without a resolved tenant get a context on the default
/// connection, which refuses tenant-scoped work through `require_tenant`.
pub struct TenantDb(pub TenantDbContext);

#[async_trait]
impl<S> FromRequestParts<S> for TenantDb
where
    S: Send + Sync,
    DbContextFactory: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let factory = DbContextFactory::from_ref(state);
        let resolved = parts.extensions.get::<ResolvedTenant>();
        let context = factory.unbound().bind(resolved)?;
        Ok(TenantDb(context))
    }
}
