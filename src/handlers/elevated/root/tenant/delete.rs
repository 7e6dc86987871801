// handlers/elevated/root/tenant/delete.rs - DELETE /api/root/tenants/:id handler
//
// Removes the catalog entry, then drops the tenant database.

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::{models::Tenant, TenantFilter};
use crate::middleware::{ApiResponse, ApiResult};

pub async fn tenant_delete(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Tenant> {
    let tenant = state.tenants.delete(&TenantFilter::by_id(id)).await?;
    Ok(ApiResponse::success(tenant))
}
