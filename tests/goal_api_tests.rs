// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end goal API tests against a real document store.
//!
//! Set MONGODB_TEST_URI to run, e.g. mongodb://localhost:27017.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

async fn signed_up_user(app: &axum::Router) -> String {
    let email = common::unique_email("goals");
    common::register_user(app, "Test Runner", &email, "correct-horse-battery").await;
    common::login_user(app, &email, "correct-horse-battery").await
}

fn goal_body() -> serde_json::Value {
    json!({
        "title": "Run 5k",
        "category": "Cardio",
        "targetValue": 5,
        "unit": "km",
        "startDate": "2024-01-01",
        "targetDate": "2024-06-01"
    })
}

async fn create_goal(app: &axum::Router, cookie: &str) -> serde_json::Value {
    let mut request = common::json_request("POST", "/api/goals", goal_body());
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    common::body_json(response).await
}

#[tokio::test]
async fn test_goal_creation_defaults() {
    require_mongo!();
    let (app, _) = common::create_mongo_test_app().await;
    let cookie = signed_up_user(&app).await;

    let goal = create_goal(&app, &cookie).await;

    assert_eq!(goal["progress"], json!(0.0));
    assert_eq!(goal["status"], json!("In Progress"));
    assert_eq!(goal["currentValue"], json!(0.0));
    assert_eq!(goal["isCompleted"], json!(false));
}

#[tokio::test]
async fn test_goal_round_trip() {
    require_mongo!();
    let (app, _) = common::create_mongo_test_app().await;
    let cookie = signed_up_user(&app).await;

    let created = create_goal(&app, &cookie).await;
    let id = created["_id"].as_str().expect("created goal has an id");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/goals/{}", id))
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched = common::body_json(response).await;

    for field in ["title", "category", "targetValue", "unit", "startDate", "targetDate"] {
        assert_eq!(fetched[field], created[field], "field {} must round-trip", field);
    }
}

#[tokio::test]
async fn test_progress_caps_at_100() {
    require_mongo!();
    let (app, _) = common::create_mongo_test_app().await;
    let cookie = signed_up_user(&app).await;

    let created = create_goal(&app, &cookie).await;
    let id = created["_id"].as_str().unwrap();

    let mut request = common::json_request(
        "PATCH",
        &format!("/api/goals/{}", id),
        json!({ "currentValue": 5000 }),
    );
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = common::body_json(response).await;
    assert_eq!(updated["progress"], json!(100.0));
    assert_eq!(updated["status"], json!("Completed"));
    assert_eq!(updated["isCompleted"], json!(true));
    assert!(updated["completedDate"].is_string());
}

#[tokio::test]
async fn test_delete_is_idempotent_in_effect() {
    require_mongo!();
    let (app, _) = common::create_mongo_test_app().await;
    let cookie = signed_up_user(&app).await;

    let created = create_goal(&app, &cookie).await;
    let id = created["_id"].as_str().unwrap();

    let delete = |uri: String, cookie: String| {
        let app = app.clone();
        async move {
            app.oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(uri)
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
        }
    };

    let first = delete(format!("/api/goals/{}", id), cookie.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = delete(format!("/api/goals/{}", id), cookie.clone()).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cross_user_goal_access_is_403() {
    require_mongo!();
    let (app, _) = common::create_mongo_test_app().await;

    let owner_cookie = signed_up_user(&app).await;
    let created = create_goal(&app, &owner_cookie).await;
    let id = created["_id"].as_str().unwrap();

    let other_cookie = signed_up_user(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/goals/{}", id))
                .header(header::COOKIE, other_cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Ownership check precedes existence masking: 403, not 404.
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_goal_list_is_scoped_to_owner() {
    require_mongo!();
    let (app, _) = common::create_mongo_test_app().await;

    let owner_cookie = signed_up_user(&app).await;
    let created = create_goal(&app, &owner_cookie).await;
    let id = created["_id"].as_str().unwrap();

    let other_cookie = signed_up_user(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/goals?limit=100")
                .header(header::COOKIE, other_cookie.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let ids: Vec<&str> = body["goals"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["_id"].as_str().unwrap())
        .collect();
    assert!(!ids.contains(&id));
}

#[tokio::test]
async fn test_login_with_unknown_email_is_generic_401() {
    require_mongo!();
    let (app, _) = common::create_mongo_test_app().await;

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/login",
            json!({
                "email": common::unique_email("nobody"),
                "password": "whatever-it-takes"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "invalid_credentials");
    // The same body a wrong password produces; nothing reveals that the
    // email is unregistered.
    assert_eq!(body["details"], json!("Invalid email or password"));
}

#[tokio::test]
async fn test_duplicate_registration_is_409() {
    require_mongo!();
    let (app, _) = common::create_mongo_test_app().await;

    let email = common::unique_email("dup");
    common::register_user(&app, "First", &email, "correct-horse-battery").await;

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/register",
            json!({ "name": "Second", "email": email, "password": "correct-horse-battery" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
