mod common;

use std::sync::Arc;

use axum::{body::Body, http::StatusCode};
use serde_json::{json, Value};

use tenantry::database::{DatabaseManager, MemoryTenantCatalog, TenantCatalog, TenantFilter};
use tenantry::testing::{self, RecordingSchemaManager, UnreachableCatalog, TEST_TEMPLATE};

use tenantry::AppState;

use common::{root_token, send, user_token, TestApp};

fn json_body(value: Value) -> Body {
    Body::from(value.to_string())
}

#[tokio::test]
async fn create_provisions_and_registers_tenant() {
    let app = TestApp::with(MemoryTenantCatalog::new(), RecordingSchemaManager::default());
    let token = root_token();

    let (status, body) = send(
        app.router(),
        common::request(
            "POST",
            "/api/root/tenants",
            Some(&token),
            json_body(json!({ "name": "Acme", "subdomain": "acme", "database_name": "acme_db" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    let created: Value = serde_json::from_str(&body).expect("json");
    let id = created["data"]["id"].as_i64().expect("id") as i32;

    let stored = app
        .catalog
        .find(&TenantFilter::by_id(id))
        .await
        .expect("catalog")
        .expect("tenant stored");
    assert_eq!(stored.database_name, "acme_db");
    assert_eq!(
        app.schema.migrated().await,
        vec![TEST_TEMPLATE.replace("{0}", "acme_db")]
    );
}

#[tokio::test]
async fn create_then_show_returns_same_record() {
    let app = TestApp::with(MemoryTenantCatalog::new(), RecordingSchemaManager::default());
    let token = root_token();

    let (_, body) = send(
        app.router(),
        common::request(
            "POST",
            "/api/root/tenants",
            Some(&token),
            json_body(json!({ "name": "Globex", "subdomain": "globex" })),
        ),
    )
    .await;
    let created: Value = serde_json::from_str(&body).expect("json");
    let id = created["data"]["id"].as_i64().expect("id");

    let (status, body) = send(
        app.router(),
        common::get(&format!("/api/root/tenants/{}", id), Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let shown: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(shown["data"], created["data"]);
}

#[tokio::test]
async fn delete_then_show_is_not_found() {
    let app = TestApp::seeded();
    let token = root_token();

    let (status, _) = send(
        app.router(),
        common::request("DELETE", "/api/root/tenants/7", Some(&token), Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        app.schema.dropped().await,
        vec![TEST_TEMPLATE.replace("{0}", "tenant7db")]
    );

    let (status, _) = send(app.router(), common::get("/api/root/tenants/7", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_unknown_tenant_is_not_found() {
    let app = TestApp::seeded();

    let (status, _) = send(
        app.router(),
        common::request("DELETE", "/api/root/tenants/99", Some(&root_token()), Body::empty()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.schema.dropped().await.is_empty());
}

#[tokio::test]
async fn failed_provisioning_leaves_catalog_unchanged() {
    let app = TestApp::with(
        MemoryTenantCatalog::new(),
        RecordingSchemaManager::failing_migrations(),
    );

    let (status, _) = send(
        app.router(),
        common::request(
            "POST",
            "/api/root/tenants",
            Some(&root_token()),
            json_body(json!({ "name": "Acme", "subdomain": "acme" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.catalog.len().await, 0);
}

#[tokio::test]
async fn invalid_payload_is_a_validation_error() {
    let app = TestApp::with(MemoryTenantCatalog::new(), RecordingSchemaManager::default());

    let (status, body) = send(
        app.router(),
        common::request(
            "POST",
            "/api/root/tenants",
            Some(&root_token()),
            json_body(json!({ "name": "", "subdomain": "acme" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["field_errors"]["name"].is_string());
}

#[tokio::test]
async fn administration_requires_root_access() {
    let app = TestApp::seeded();

    let (status, _) = send(
        app.router(),
        common::get("/api/root/tenants", Some(&user_token(Some("7")))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(app.router(), common::get("/api/root/tenants", Some(&root_token()))).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn health_reports_catalog_status() {
    let app = TestApp::seeded();

    let (status, body) = send(app.router(), common::get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["data"]["catalog"], "ok");
}

#[tokio::test]
async fn health_reports_degraded_catalog() {
    let state = TestApp::state_with_catalog(Arc::new(UnreachableCatalog));

    let (status, body) = send(tenantry::app(state), common::get("/health", None)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(json["success"], false);
    assert_eq!(json["data"]["status"], "degraded");
}

#[tokio::test]
async fn tenant_with_hyphenated_database_name_can_be_deleted() {
    let app = TestApp::with(
        MemoryTenantCatalog::with_tenants(vec![testing::tenant(7, "Acme", "tenant-7")]),
        RecordingSchemaManager::default(),
    );

    let (status, _) = send(
        app.router(),
        common::request("DELETE", "/api/root/tenants/7", Some(&root_token()), Body::empty()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.catalog.len().await, 0);
    assert_eq!(
        app.schema.dropped().await,
        vec![TEST_TEMPLATE.replace("{0}", "tenant-7")]
    );
}

#[tokio::test]
async fn routes_are_served_with_request_logging_disabled() {
    let mut config = testing::test_config();
    config.api.enable_request_logging = false;
    let pools = DatabaseManager::new(&config.database);
    let state = AppState::new(
        config,
        Arc::new(testing::seeded_catalog()),
        pools,
        Arc::new(RecordingSchemaManager::default()),
    );

    let (status, body) = send(
        tenantry::app(state),
        common::get("/api/root/tenants", Some(&root_token())),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
}
