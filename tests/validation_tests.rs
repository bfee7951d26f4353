// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resource validation tests.
//!
//! Schema checks run before any store access, so every test here works
//! against the offline store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use mongodb::bson::oid::ObjectId;
use serde_json::json;
use tower::ServiceExt;

mod common;

fn bearer(state: &wellness_tracker::AppState) -> String {
    let token = state
        .session_keys
        .issue(ObjectId::new(), "runner@example.com")
        .unwrap();
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_goal_create_lists_every_violation() {
    let (app, state) = common::create_test_app();

    let mut request = common::json_request(
        "POST",
        "/api/goals",
        json!({
            "title": "Go",
            "category": "Cardio",
            "targetValue": -5,
            "unit": "",
            "targetDate": "2024-06-01"
        }),
    );
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, bearer(&state).parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_failed");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"targetValue"));
    assert!(fields.contains(&"unit"));
}

#[tokio::test]
async fn test_goal_unknown_category_is_400() {
    let (app, state) = common::create_test_app();

    let mut request = common::json_request(
        "POST",
        "/api/goals",
        json!({
            "title": "Run 5k",
            "category": "Juggling",
            "targetValue": 5,
            "unit": "km",
            "targetDate": "2024-06-01"
        }),
    );
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, bearer(&state).parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_id_is_400_before_store_access() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/goals/not-an-object-id")
                .header(header::AUTHORIZATION, bearer(&state))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Offline store would answer 503; a 400 proves the id check ran first.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_page_zero_is_400() {
    let (app, state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/posts?page=0")
                .header(header::AUTHORIZATION, bearer(&state))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_multipart_post_lists_every_violation() {
    let (app, state) = common::create_test_app();

    let boundary = "test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\n\
         \r\n--{b}\r\nContent-Disposition: form-data; name=\"content\"\r\n\r\n\
         \r\n--{b}\r\nContent-Disposition: form-data; name=\"category\"\r\n\r\n\
         breakfast\r\n--{b}--\r\n",
        b = boundary
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/posts")
                .header(header::AUTHORIZATION, bearer(&state))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_failed");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "content", "category"]);
}

#[tokio::test]
async fn test_community_create_validates_name_and_url() {
    let (app, state) = common::create_test_app();

    let mut request = common::json_request(
        "POST",
        "/api/communities",
        json!({
            "name": "ab",
            "description": "Lifting together",
            "category": "Fitness",
            "image": "not a url"
        }),
    );
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, bearer(&state).parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"image"));
}
