//! Shared helpers for API integration tests.
//!
//! Every test app runs on a fresh in-memory SQLite database with migrations
//! applied, behind the same middleware stack the binary uses.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use taskhist_api::auth::jwt::{generate_access_token, JwtConfig};
use taskhist_api::config::{ServerConfig, TaskHistoryConfig};
use taskhist_api::router::build_app_router;
use taskhist_api::state::AppState;
use taskhist_core::permissions::MONITORING_PATH;

const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(advanced_permissions_enabled: bool) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        advanced_permissions_enabled,
        task_history: TaskHistoryConfig::default(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Fresh migrated in-memory pool.
pub async fn test_pool() -> taskhist_db::DbPool {
    let pool = taskhist_db::create_in_memory_pool().await.unwrap();
    taskhist_db::run_migrations(&pool).await.unwrap();
    pool
}

/// Build state plus the full application router.
pub async fn build_test_app_with(advanced_permissions_enabled: bool) -> (AppState, Router) {
    let config = test_config(advanced_permissions_enabled);
    let state = AppState::new(test_pool().await, config.clone());
    let app = build_app_router(state.clone(), &config);
    (state, app)
}

/// Build the application with advanced permissions disabled.
pub async fn build_test_app() -> (AppState, Router) {
    build_test_app_with(false).await
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

fn token(role: &str, perms: &[String]) -> String {
    let config = test_config(false);
    generate_access_token(1, role, perms, &config.jwt).unwrap()
}

/// Token for an admin (implicitly holds `/`).
pub fn admin_token() -> String {
    token("admin", &[])
}

/// Token for a regular user granted the monitoring capability.
pub fn monitoring_token() -> String {
    token("user", &[MONITORING_PATH.to_string()])
}

/// Token for a regular user with no capabilities.
pub fn plain_user_token() -> String {
    token("user", &[])
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
