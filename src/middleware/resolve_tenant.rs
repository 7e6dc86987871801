use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::auth::AuthUser;
use crate::app::AppState;
use crate::database::filter::TenantFilter;
use crate::error::ApiError;
use crate::types::ResolvedTenant;

/// Middleware that maps the caller's tenant claim onto a catalog record.
///
/// * no identity, no claim, or a claim that is not a non-negative integer:
///   the request continues without tenant context
/// * claim names an unknown tenant: `403` with a plain-text body, the rest of
///   the pipeline never runs
/// * claim names a known tenant: [`ResolvedTenant`] is stored in the request
///   extensions for the data context to bind to
///
/// Must be layered inside `jwt_auth_middleware`.
pub async fn resolve_tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claim_name = &state.config.tenancy.tenant_claim;
    let raw_claim = request
        .extensions()
        .get::<AuthUser>()
        .and_then(|user| user.claim(claim_name));

    let Some(tenant_id) = raw_claim.as_deref().and_then(parse_tenant_id) else {
        tracing::debug!("No usable '{}' claim, continuing without tenant", claim_name);
        return next.run(request).await;
    };

    match state.catalog.find(&TenantFilter::by_id(tenant_id)).await {
        Ok(Some(tenant)) => {
            tracing::debug!(
                "Resolved tenant {} ({}) -> {}",
                tenant.id,
                tenant.name,
                tenant.database_name
            );
            request.extensions_mut().insert(ResolvedTenant::from(tenant));
            next.run(request).await
        }
        Ok(None) => {
            tracing::warn!("Tenant resolution failed: tenant {} not found", tenant_id);
            (StatusCode::FORBIDDEN, format!("Tenant {} not found", tenant_id)).into_response()
        }
        Err(e) => {
            tracing::error!("Catalog lookup for tenant {} failed: {}", tenant_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Tenant ids are non-negative integers; anything else counts as no claim
pub fn parse_tenant_id(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|id| *id >= 0)
}
