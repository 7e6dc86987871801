pub mod auth;
pub mod resolve_tenant;
pub mod response;
pub mod tenant_db;

pub use auth::{jwt_auth_middleware, require_root_middleware, AuthUser};
pub use resolve_tenant::{parse_tenant_id, resolve_tenant_middleware};
pub use response::{ApiResponse, ApiResult};
pub use tenant_db::TenantDb;
