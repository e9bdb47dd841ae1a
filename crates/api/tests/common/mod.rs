#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use vrlog_api::auth::jwt::JwtConfig;
use vrlog_api::auth::password::hash_password;
use vrlog_api::config::ServerConfig;
use vrlog_api::liveness::SessionTracker;
use vrlog_api::router::build_app_router;
use vrlog_api::state::AppState;
use vrlog_core::session_liveness::LivenessConfig;
use vrlog_core::timestamp::DisplayZone;
use vrlog_db::models::admin::CreateAdmin;
use vrlog_db::repositories::AdminRepo;

pub const ADMIN_USERNAME: &str = "operator";
pub const ADMIN_PASSWORD: &str = "operator-pw-123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        display_zone: DisplayZone::default(),
        liveness: LivenessConfig::default(),
        liveness_sweep_secs: 5,
        admin_bootstrap: None,
    }
}

/// Application state over `pool` with an empty session tracker.
pub fn build_test_state(pool: PgPool) -> AppState {
    let config = test_config();
    AppState {
        pool,
        tracker: Arc::new(SessionTracker::new(config.liveness)),
        config: Arc::new(config),
    }
}

/// Full router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(build_test_state(pool), &test_config())
}

/// Router over an existing state, for tests that inspect the tracker.
pub fn build_test_app_with_state(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

/// POST a raw body, optionally with a `Content-Type` header.
pub async fn post_raw(app: Router, uri: &str, content_type: Option<&str>, body: &str) -> Response {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn post_empty(app: Router, uri: &str, token: Option<&str>) -> Response {
    send(app, request(Method::POST, uri, token, None)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Insert the standard test admin.
pub async fn create_admin(pool: &PgPool) {
    AdminRepo::upsert(
        pool,
        &CreateAdmin {
            username: ADMIN_USERNAME.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
        },
    )
    .await
    .unwrap();
}

/// Dashboard login; returns the full JSON response.
pub async fn login(app: Router, username: &str, password: Option<&str>) -> Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}

/// Create the test admin, log in, and return `(access_token, session_id)`.
pub async fn admin_token(app: Router, pool: &PgPool) -> (String, String) {
    create_admin(pool).await;
    let json = login(app, ADMIN_USERNAME, Some(ADMIN_PASSWORD)).await;
    (
        json["access_token"].as_str().unwrap().to_string(),
        json["session_id"].as_str().unwrap().to_string(),
    )
}

/// Register an SDK user through the action API.
pub async fn register_user(app: Router, username: &str, password: Option<&str>) -> Value {
    let body = serde_json::json!({
        "action": "register",
        "username": username,
        "password": password,
    });
    let response = post_json(app, "/api/v1/vr-log", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}

