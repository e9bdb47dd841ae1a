//! HTTP-level integration tests for dashboard auth and role checks.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, get, get_auth, login, post_empty, post_json, post_json_auth,
    register_user, ADMIN_PASSWORD, ADMIN_USERNAME,
};
use serde_json::json;
use sqlx::PgPool;
use vrlog_db::repositories::{SessionRepo, UserRepo};

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_login_returns_token_and_session(pool: PgPool) {
    common::create_admin(&pool).await;
    let app = common::build_test_app(pool.clone());

    let json = login(app, ADMIN_USERNAME, Some(ADMIN_PASSWORD)).await;

    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["username"], ADMIN_USERNAME);
    assert_eq!(json["user"]["is_admin"], true);

    // The session row belongs to the same-named user account.
    let mirror = UserRepo::find_by_username(&pool, ADMIN_USERNAME)
        .await
        .unwrap()
        .expect("admin login should create a user row for its sessions");
    let session_id = json["session_id"].as_str().unwrap().parse().unwrap();
    let session = SessionRepo::find_by_id(&pool, session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.user_id, mirror.id);
    assert!(session.is_open());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn passwordless_user_login_is_not_admin(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(app.clone(), "player1", None).await;

    let json = login(app, "player1", None).await;

    assert_eq!(json["user"]["is_admin"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_admin_password_falls_through_to_401(pool: PgPool) {
    common::create_admin(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({ "username": ADMIN_USERNAME, "password": "nope" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_username_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "username": "ghost", "password": "whatever" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid username or password");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_username_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/login", json!({ "username": "  " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Me / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn me_reflects_token_claims(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, session_id) = admin_token(app.clone(), &pool).await;

    let response = get_auth(app, "/api/v1/auth/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "admin");
    assert_eq!(json["data"]["session_id"], session_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_without_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_closes_session_and_stops_tracking(pool: PgPool) {
    let state = common::build_test_state(pool.clone());
    let app = common::build_test_app_with_state(state.clone());
    let (token, session_id) = admin_token(app.clone(), &pool).await;
    let session_id = session_id.parse().unwrap();
    assert!(state.tracker.contains(session_id).await);

    let response = post_empty(app.clone(), "/api/v1/auth/logout", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(!state.tracker.contains(session_id).await);
    let session = SessionRepo::find_by_id(&pool, session_id)
        .await
        .unwrap()
        .unwrap();
    let first_logout = session.logout_time.expect("logout_time should be set");

    // A second logout with the same token is harmless.
    let response = post_empty(app, "/api/v1/auth/logout", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let session = SessionRepo::find_by_id(&pool, session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.logout_time, Some(first_logout));
}

// ---------------------------------------------------------------------------
// RBAC
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn regular_users_can_read_but_not_write(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(app.clone(), "player1", None).await;
    let json = login(app.clone(), "player1", None).await;
    let token = json["access_token"].as_str().unwrap();

    let response = get_auth(app.clone(), "/api/v1/vr-logs", token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json!({
        "device_id": "HMD-01",
        "content_name": "Ocean Dive",
        "start_time": "2024-05-01T10:00:00Z",
    });
    let response = post_json_auth(app, "/api/v1/vr-logs", body, token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dashboard_reads_require_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    for uri in [
        "/api/v1/vr-logs",
        "/api/v1/content-logs",
        "/api/v1/user-sessions",
        "/api/v1/content-data",
        "/api/v1/stats/overview",
        "/api/v1/export/vr-logs.csv",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}
