// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware for API routes.

use crate::error::AppError;
use crate::services::session::SESSION_COOKIE;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

/// Authenticated user extracted from a session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: ObjectId,
    pub email: String,
}

/// Extract and verify the session carried by a request.
///
/// The cookie is tried first, then the bearer header. Purely local: no
/// store access.
pub fn session_from_request(
    state: &AppState,
    jar: &CookieJar,
    headers: &HeaderMap,
) -> Result<AuthUser, AppError> {
    let token = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header {
            Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
            _ => return Err(AppError::InvalidSession),
        }
    };

    let claims = state.session_keys.verify(&token)?;
    let id = ObjectId::parse_str(&claims.sub).map_err(|_| AppError::InvalidSession)?;

    Ok(AuthUser {
        id,
        email: claims.email,
    })
}

/// Middleware that requires a valid session on API routes.
///
/// Fails with a 401 JSON body; navigations are handled by the request
/// gate, which redirects instead.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = session_from_request(&state, &jar, request.headers())?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
