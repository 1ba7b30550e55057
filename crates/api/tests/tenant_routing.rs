use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hms_api::{routes::create_router, AppState};
use hms_database::{
    CachedTenantDirectory, DbContextFactory, DbContextOptions, DirectoryCacheConfig,
    InMemoryTenantDirectory, TenantServerSettings,
};
use hms_models::Tenant;
use hms_tenant::{QueueSettings, TenantDbContextResolver, TenantResolver};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn tenants() -> Vec<Tenant> {
    let mut queued = Tenant::new(2, "HOTEL002", "Hotel Two")
        .with_connection_string("Server=other.internal;Database=custom_db;User Id=u;Password=p");
    queued.enable_queue_mode = Some(true);
    queued.queue_worker_interval_seconds = Some(2);

    vec![
        Tenant::new(1, "HOTEL001", "Hotel One")
            .with_database("hotel001_db")
            .with_base_url("https://one.hotels.example"),
        queued,
        Tenant::new(3, "HOTEL003", "Hotel Three"),
        Tenant::new(4, "HOTEL004", "Hotel Four").with_connection_string("Server=x;Database=custom_db;..."),
    ]
}

fn state() -> Arc<AppState> {
    let directory = CachedTenantDirectory::new(
        InMemoryTenantDirectory::new(tenants()),
        DirectoryCacheConfig::default(),
    );
    let server = TenantServerSettings {
        server: Some("db.hotels.internal".to_string()),
        port: None,
        user_id: Some("hotel_app".to_string()),
        password: Some("pw".to_string()),
        ssl_mode: None,
    };

    Arc::new(AppState {
        tenant_resolver: TenantResolver::new(Arc::new(directory), server),
        context_resolver: TenantDbContextResolver::new(DbContextFactory::new(DbContextOptions::default())),
        queue_defaults: QueueSettings::default(),
    })
}

fn app(state: &Arc<AppState>) -> Router {
    create_router(state.clone())
}

fn get(uri: &str, hotel: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(code) = hotel {
        builder = builder.header("x-hotel-code", code);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, hotel: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(code) = hotel {
        builder = builder.header("x-hotel-code", code);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_needs_no_hotel_code() {
    let state = state();
    let res = app(&state).oneshot(get("/health", None)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn missing_hotel_code_is_401_with_hint() {
    let state = state();
    let res = app(&state).oneshot(get("/api/customers", None)).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(res).await;
    assert_eq!(body["error"], "tenant_not_resolved");
    assert!(body["hint"].as_str().unwrap().contains("X-Hotel-Code"));
    assert_eq!(state.context_resolver.factory().stats().contexts_created, 0);
}

#[tokio::test]
async fn unknown_hotel_code_is_404() {
    let state = state();
    let res = app(&state)
        .oneshot(get("/api/expenses", Some("HOTEL999")))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = json_body(res).await;
    assert_eq!(body["error"], "hotel_not_found");
    assert_eq!(state.context_resolver.factory().stats().contexts_created, 0);
}

#[tokio::test]
async fn current_hotel_reflects_header_case_insensitively() {
    let state = state();
    let res = app(&state)
        .oneshot(get("/api/hotel/current", Some(" hotel001 ")))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["hotel"]["code"], "HOTEL001");
    assert_eq!(body["hotel"]["base_url"], "https://one.hotels.example");
    assert_eq!(body["database"], "hotel001_db");
    assert_eq!(body["queue"]["default_partner"], "Zaaer");
}

#[tokio::test]
async fn current_hotel_applies_queue_overrides() {
    let state = state();
    let res = app(&state)
        .oneshot(get("/api/hotel/current", Some("HOTEL002")))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["queue"]["enable_queue_mode"], true);
    assert_eq!(body["queue"]["worker_interval_seconds"], 5);
    assert_eq!(body["queue"]["worker_batch_size"], 50);
}

#[tokio::test]
async fn tenant_without_database_is_configuration_error() {
    let state = state();
    let res = app(&state)
        .oneshot(get("/api/customers", Some("HOTEL003")))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(res).await;
    assert_eq!(body["error"], "tenant_configuration_error");
    assert!(body["message"].as_str().unwrap().contains("HOTEL003"));
    assert_eq!(state.context_resolver.factory().stats().contexts_created, 0);
}

#[tokio::test]
async fn malformed_connection_string_is_construction_error() {
    let state = state();
    let res = app(&state)
        .oneshot(get("/api/expenses/1", Some("HOTEL004")))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(res).await;
    assert_eq!(body["error"], "context_construction_failed");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("HOTEL004"));
    assert!(!message.contains("segment"));
    assert!(!message.contains("Server=x"));
}

#[tokio::test]
async fn invalid_customer_is_rejected_with_400() {
    let state = state();
    let res = app(&state)
        .oneshot(post_json(
            "/api/customers",
            Some("HOTEL001"),
            r#"{"customer_name": "", "email": "not-an-email"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(state.context_resolver.factory().stats().contexts_created, 1);
}

#[tokio::test]
async fn admin_lists_hotels_without_hotel_code() {
    let state = state();
    let res = app(&state).oneshot(get("/api/tenant/hotels", None)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["HOTEL001", "HOTEL002", "HOTEL003", "HOTEL004"]);
    assert!(body[1].get("connection_string").is_none());
}

#[tokio::test]
async fn admin_get_hotel_by_code() {
    let state = state();

    let res = app(&state).oneshot(get("/api/tenant/hotels/hotel002", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["name"], "Hotel Two");

    let res = app(&state).oneshot(get("/api/tenant/hotels/HOTEL999", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn admin_invalidates_cache() {
    let state = state();

    let res = app(&state)
        .oneshot(post_json("/api/tenant/cache/invalidate", None, r#"{"code": "HOTEL001"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["invalidated"], "HOTEL001");

    let res = app(&state)
        .oneshot(post_json("/api/tenant/cache/invalidate", None, "{}"))
        .await
        .unwrap();
    assert_eq!(json_body(res).await["invalidated"], "all");
}

#[tokio::test]
async fn invalidating_a_hotel_closes_its_pool() {
    let state = state();
    let factory = state.context_resolver.factory();

    // Any hotel-scoped request leaves a pool behind for HOTEL001 and HOTEL002
    for code in ["HOTEL001", "HOTEL002"] {
        app(&state)
            .oneshot(post_json("/api/customers", Some(code), r#"{"customer_name": ""}"#))
            .await
            .unwrap();
    }
    let hotel002 = "Server=other.internal;Database=custom_db;User Id=u;Password=p";

    let res = app(&state)
        .oneshot(post_json("/api/tenant/cache/invalidate", None, r#"{"code": "hotel002"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["invalidated"], "hotel002");
    assert_eq!(body["pools_closed"], 1);
    assert!(!factory.evict(hotel002).await);

    // Unknown hotels have nothing to close
    let res = app(&state)
        .oneshot(post_json("/api/tenant/cache/invalidate", None, r#"{"code": "HOTEL999"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["pools_closed"], 0);

    // HOTEL001 is still pooled until everything is invalidated
    let res = app(&state)
        .oneshot(post_empty("/api/tenant/cache/invalidate"))
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body["invalidated"], "all");
    assert_eq!(body["pools_closed"], 1);
}

#[tokio::test]
async fn invalidate_accepts_empty_body_and_rejects_malformed_json() {
    let state = state();

    let res = app(&state)
        .oneshot(post_empty("/api/tenant/cache/invalidate"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["invalidated"], "all");

    let res = app(&state)
        .oneshot(post_json("/api/tenant/cache/invalidate", None, "{\"code\":"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["error"], "invalid_input");
}

#[tokio::test]
async fn exempt_paths_cannot_reach_tenant_data() {
    // A hotel code on an exempt path is ignored, so the stats reflect no resolution
    let state = state();
    let res = app(&state)
        .oneshot(get("/api/tenant/stats", Some("HOTEL001")))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["contexts_created"], 0);
}

#[tokio::test]
async fn concurrent_requests_for_different_hotels_stay_isolated() {
    let state = state();
    let mut handles = Vec::new();

    for i in 0..20 {
        let router = app(&state);
        let (code, expected) = if i % 2 == 0 { ("HOTEL001", "HOTEL001") } else { ("hotel002", "HOTEL002") };
        handles.push(tokio::spawn(async move {
            let res = router.oneshot(get("/api/hotel/current", Some(code))).await.unwrap();
            (expected, json_body(res).await)
        }));
    }

    for handle in handles {
        let (expected, body) = handle.await.unwrap();
        assert_eq!(body["hotel"]["code"], expected);
    }
}
