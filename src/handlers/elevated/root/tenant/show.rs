// handlers/elevated/root/tenant/show.rs - GET /api/root/tenants/:id handler

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::{models::Tenant, TenantFilter};
use crate::middleware::{ApiResponse, ApiResult};

pub async fn tenant_show(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Tenant> {
    let tenant = state.tenants.get(&TenantFilter::by_id(id)).await?;
    Ok(ApiResponse::success(tenant))
}
