#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use tenantry::auth::{generate_jwt, Claims};
use tenantry::database::{DatabaseManager, MemoryTenantCatalog, SchemaManager, TenantCatalog};
use tenantry::testing::{self, RecordingSchemaManager};
use tenantry::AppState;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub state: AppState,
    pub catalog: Arc<MemoryTenantCatalog>,
    pub schema: Arc<RecordingSchemaManager>,
}

impl TestApp {
    /// State over the seeded catalog: tenant 7 -> tenant7db, tenant 3 -> tenant3db
    pub fn seeded() -> Self {
        Self::with(testing::seeded_catalog(), RecordingSchemaManager::default())
    }

    pub fn with(catalog: MemoryTenantCatalog, schema: RecordingSchemaManager) -> Self {
        let config = testing::test_config();
        let catalog = Arc::new(catalog);
        let schema = Arc::new(schema);
        let schema_dyn: Arc<dyn SchemaManager> = schema.clone();
        let pools = DatabaseManager::new(&config.database);
        let state = AppState::new(config, catalog.clone(), pools, schema_dyn);
        Self {
            state,
            catalog,
            schema,
        }
    }

    /// State over any catalog implementation, with a default schema manager
    pub fn state_with_catalog(catalog: Arc<dyn TenantCatalog>) -> AppState {
        let config = testing::test_config();
        let pools = DatabaseManager::new(&config.database);
        AppState::new(config, catalog, pools, Arc::new(RecordingSchemaManager::default()))
    }

    pub fn router(&self) -> Router {
        tenantry::app(self.state.clone())
    }
}

/// Signed token for a regular user, with the tenant claim when given
pub fn user_token(tenant_claim: Option<&str>) -> String {
    let mut claims = Claims::new("alice", "user", 1);
    if let Some(value) = tenant_claim {
        claims = claims.with_claim("TenantId", value);
    }
    generate_jwt(&claims, SECRET).expect("token")
}

pub fn root_token() -> String {
    generate_jwt(&Claims::new("ops", "root", 1), SECRET).expect("token")
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, Body::empty())
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .expect("request")
}

/// Send a request and collect status and body text
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}
