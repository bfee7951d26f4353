// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use std::sync::Arc;
use wellness_tracker::config::Config;
use wellness_tracker::db::DocumentStore;
use wellness_tracker::routes::create_router;
use wellness_tracker::services::{GoogleOauth, SessionKeys};
use wellness_tracker::AppState;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn mongo_available() -> bool {
    std::env::var("MONGODB_TEST_URI").is_ok()
}

/// Skip test with message if no test database is available.
#[macro_export]
macro_rules! require_mongo {
    () => {
        if !crate::common::mongo_available() {
            eprintln!("⚠️  Skipping: MONGODB_TEST_URI not set");
            return;
        }
    };
}

/// Create a test app with an offline store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::test_default();
    let store = DocumentStore::new_offline();
    let session_keys = SessionKeys::new(&config.session_secret);
    let google = GoogleOauth::from_config(&config);

    let state = Arc::new(AppState {
        config,
        store,
        session_keys,
        google,
    });

    (create_router(state.clone()), state)
}

/// Create a test app backed by the database named in MONGODB_TEST_URI.
/// Call `require_mongo!()` first.
#[allow(dead_code)]
pub async fn create_mongo_test_app() -> (Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.mongodb_uri = std::env::var("MONGODB_TEST_URI").expect("MONGODB_TEST_URI not set");

    let store = DocumentStore::connect(&config)
        .await
        .expect("Failed to connect to test database");
    let session_keys = SessionKeys::new(&config.session_secret);

    let state = Arc::new(AppState {
        config,
        store,
        session_keys,
        google: None,
    });

    (create_router(state.clone()), state)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not valid JSON")
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

/// Extract the `auth-token` cookie pair from a login response.
#[allow(dead_code)]
pub fn session_cookie_value(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("auth-token="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Register a user through the API, returning the user JSON.
/// Requires a database-backed app.
#[allow(dead_code)]
pub async fn register_user(app: &Router, name: &str, email: &str, password: &str) -> serde_json::Value {
    use tower::ServiceExt;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({ "name": name, "email": email, "password": password }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

/// Log a user in, returning the session cookie pair ("auth-token=...").
#[allow(dead_code)]
pub async fn login_user(app: &Router, email: &str, password: &str) -> String {
    use tower::ServiceExt;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    session_cookie_value(&response).expect("login response has no session cookie")
}

/// A unique email for test isolation across runs.
#[allow(dead_code)]
pub fn unique_email(prefix: &str) -> String {
    format!(
        "{}-{}@example.com",
        prefix,
        mongodb::bson::oid::ObjectId::new().to_hex()
    )
}
