// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod communities;
pub mod goals;
pub mod meal_prep;
pub mod posts;
pub mod workouts;

use crate::error::{AppError, Result};
use crate::middleware::{require_auth, session_gate};
use crate::AppState;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ─── Shared list plumbing ────────────────────────────────────

pub(crate) const MAX_LIMIT: u32 = 100;

pub(crate) fn default_page() -> u32 {
    1
}
pub(crate) fn default_limit() -> u32 {
    10
}

/// Page metadata derived from the total match count.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        Self {
            total,
            page,
            pages: total.div_ceil(u64::from(limit)),
        }
    }
}

/// Validate pagination query parameters, capping the page size.
pub(crate) fn page_params(page: u32, limit: u32) -> Result<(u32, u32)> {
    if page < 1 {
        return Err(AppError::InvalidInput(
            "page must be greater than 0".to_string(),
        ));
    }
    Ok((page, limit.clamp(1, MAX_LIMIT)))
}

/// Parse a path id, rejecting malformed values before any store access.
pub(crate) fn parse_object_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidInput(format!("Invalid id: {}", raw)))
}

/// Body for delete confirmations.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes());

    // Resource routes (session required, 401 JSON without one)
    let protected_routes = goals::routes()
        .merge(workouts::routes())
        .merge(meal_prep::routes())
        .merge(posts::routes())
        .merge(communities::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), session_gate))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
