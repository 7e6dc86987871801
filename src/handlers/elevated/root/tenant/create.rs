// handlers/elevated/root/tenant/create.rs - POST /api/root/tenants handler
//
// Registers the tenant in the catalog, then creates and migrates its database.
//
// Expected Input:
// ```json
// {
//   "name": "Acme",             // Required
//   "subdomain": "acme",        // Required
//   "database_name": "acme_db"  // Optional, derived from the name when absent
// }
// ```

use axum::{extract::State, Json};

use crate::app::AppState;
use crate::database::models::{NewTenant, Tenant};
use crate::middleware::{ApiResponse, ApiResult};

pub async fn tenant_create(
    State(state): State<AppState>,
    Json(payload): Json<NewTenant>,
) -> ApiResult<Tenant> {
    let tenant = state.tenants.create(payload).await?;
    Ok(ApiResponse::created(tenant))
}
