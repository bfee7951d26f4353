// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request gate tests.
//!
//! Unauthenticated navigations to protected paths are redirected to the
//! login page with the original destination preserved; API paths answer
//! 401 JSON instead.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use mongodb::bson::oid::ObjectId;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_protected_path_redirects_to_login() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/dashboard/goals")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login?from=%2Fdashboard%2Fgoals"
    );
}

#[tokio::test]
async fn test_invalid_token_redirects_to_login() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/dashboard")
                .header(header::COOKIE, "auth-token=not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login?from=%2Fdashboard"
    );
}

#[tokio::test]
async fn test_valid_session_passes_gate() {
    let (app, state) = common::create_test_app();
    let token = state
        .session_keys
        .issue(ObjectId::new(), "runner@example.com")
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/dashboard")
                .header(header::COOKIE, format!("auth-token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // No page handlers exist server-side; passing the gate means the
    // request reaches the router and falls through to 404, not a redirect.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_paths_pass_without_session() {
    let (app, _) = common::create_test_app();

    for uri in ["/", "/login", "/blog/stretching", "/health"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_ne!(
            response.status(),
            StatusCode::SEE_OTHER,
            "{} should not redirect",
            uri
        );
    }
}

#[tokio::test]
async fn test_api_without_session_is_401_json() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/goals")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "invalid_session");
}

#[tokio::test]
async fn test_api_with_bearer_header_passes_auth() {
    let (app, state) = common::create_test_app();
    let token = state
        .session_keys
        .issue(ObjectId::new(), "runner@example.com")
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/goals")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Auth passed; the offline store then reports unavailability.
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
