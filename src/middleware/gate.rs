// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request gate: keeps unauthenticated navigations off protected paths.
//!
//! A pure, synchronous decision per request: public paths pass, valid
//! sessions pass, everything else is redirected to the login page with
//! the original destination preserved in a `from` query parameter. No
//! store access. API paths are exempt here; they answer 401 JSON via
//! `require_auth` instead of redirecting.

use crate::middleware::auth::session_from_request;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Path prefixes reachable without a session (auth endpoints, marketing
/// pages). The root path is matched exactly, everything else by prefix.
const PUBLIC_PREFIXES: &[&str] = &[
    "/login",
    "/register",
    "/about",
    "/contact",
    "/services",
    "/blog",
    "/faq",
    "/health",
    "/auth",
    "/api/auth",
];

/// Whether a path is exempt from the session check.
pub fn is_public(path: &str) -> bool {
    path == "/" || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Where the gate sends an unauthenticated request.
pub fn login_redirect(from: &str) -> String {
    format!("/login?from={}", urlencoding::encode(from))
}

/// Gate middleware applied to the whole router.
pub async fn session_gate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if is_public(&path) || path.starts_with("/api/") {
        return next.run(request).await;
    }

    match session_from_request(&state, &jar, request.headers()) {
        Ok(auth_user) => {
            request.extensions_mut().insert(auth_user);
            next.run(request).await
        }
        Err(_) => Redirect::to(&login_redirect(&path)).into_response(),
    }
}
