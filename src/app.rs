use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::catalog::TenantCatalog;
use crate::database::context::DbContextFactory;
use crate::database::manager::DatabaseManager;
use crate::database::schema::SchemaManager;
use crate::handlers;
use crate::middleware::{jwt_auth_middleware, require_root_middleware, resolve_tenant_middleware};
use crate::services::TenantService;

/// Shared state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn TenantCatalog>,
    pub contexts: DbContextFactory,
    pub tenants: TenantService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        catalog: Arc<dyn TenantCatalog>,
        pools: DatabaseManager,
        schema: Arc<dyn SchemaManager>,
    ) -> Self {
        let contexts = DbContextFactory::new(&config.tenancy, pools, schema);
        let tenants = TenantService::new(catalog.clone(), contexts.clone());
        Self {
            config: Arc::new(config),
            catalog,
            contexts,
            tenants,
        }
    }
}

impl FromRef<AppState> for DbContextFactory {
    fn from_ref(state: &AppState) -> Self {
        state.contexts.clone()
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .merge(tenant_routes(state.clone()))
        .merge(root_routes(state.clone()));

    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if state.config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

/// Routes that run against the caller's tenant database
fn tenant_routes(state: AppState) -> Router<AppState> {
    use handlers::protected;

    Router::new()
        .route("/api/tenant/current", get(protected::tenant_current))
        .route("/api/tenant/ping", get(protected::tenant_ping))
        // Authentication runs first, then resolution reads its claims
        .layer(
            ServiceBuilder::new()
                .layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
                .layer(from_fn_with_state(state, resolve_tenant_middleware)),
        )
}

/// Tenant administration
fn root_routes(state: AppState) -> Router<AppState> {
    use handlers::elevated::root::tenant;

    Router::new()
        .route(
            "/api/root/tenants",
            get(tenant::tenant_list).post(tenant::tenant_create),
        )
        .route(
            "/api/root/tenants/:id",
            get(tenant::tenant_show).delete(tenant::tenant_delete),
        )
        .layer(
            ServiceBuilder::new()
                .layer(from_fn_with_state(state, jwt_auth_middleware))
                .layer(from_fn(require_root_middleware)),
        )
}
