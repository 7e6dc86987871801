// handlers/protected/tenant.rs - Endpoints scoped to the caller's tenant

use axum::Extension;
use serde::Serialize;

use crate::database::models::Tenant;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, TenantDb};
use crate::types::ResolvedTenant;

#[derive(Debug, Serialize)]
pub struct CurrentTenant {
    pub subject: String,
    pub database_name: String,
    pub tenant: Tenant,
}

#[derive(Debug, Serialize)]
pub struct TenantPing {
    pub database_name: String,
    pub status: &'static str,
}

/// GET /api/tenant/current - Tenant resolved for the caller
pub async fn tenant_current(
    Extension(user): Extension<AuthUser>,
    resolved: Option<Extension<ResolvedTenant>>,
) -> ApiResult<CurrentTenant> {
    let Extension(resolved) =
        resolved.ok_or_else(|| ApiError::forbidden("No tenant is associated with this request"))?;

    Ok(ApiResponse::success(CurrentTenant {
        subject: user.subject,
        database_name: resolved.database_name,
        tenant: resolved.tenant,
    }))
}

/// GET /api/tenant/ping - Round trip to the caller's tenant database
pub async fn tenant_ping(TenantDb(db): TenantDb) -> ApiResult<TenantPing> {
    let database_name = db.ping().await?.to_string();

    Ok(ApiResponse::success(TenantPing {
        database_name,
        status: "ok",
    }))
}
