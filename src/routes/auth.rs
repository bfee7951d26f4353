// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication routes: registration, credential login, session
//! inspection, logout, and the Google external-identity flow.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::session_from_request;
use crate::models::{User, UserResponse};
use crate::services::credentials::{hash_password, verify_credentials, IdentityClaim};
use crate::services::session::{SESSION_COOKIE, SESSION_LIFETIME_SECS};
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route("/auth/google", get(google_start))
        .route("/auth/google/callback", get(google_callback))
}

// ─── Session Cookies ─────────────────────────────────────────

fn cookie_secure(state: &AppState) -> bool {
    state.config.frontend_url.starts_with("https://")
}

/// Session cookie carrying the signed token.
fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(SESSION_LIFETIME_SECS as i64))
        .secure(secure)
        .build()
}

/// Removal cookie with attributes matching the creation attributes.
fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .secure(secure)
        .build()
}

// ─── Registration ────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100, message = "name must be 2-100 characters"))]
    name: String,
    #[validate(email(message = "a valid email address is required"))]
    email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Register a new credentials user.
async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate().map_err(AppError::from_validation)?;

    let email = body.email.trim().to_lowercase();

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let now = now_rfc3339();
    let user = state
        .store
        .insert_user(User {
            id: None,
            email,
            name: body.name.trim().to_string(),
            password_hash: Some(hash_password(&body.password)?),
            image: None,
            created_at: now.clone(),
            updated_at: now,
        })
        .await?;

    tracing::info!(user_id = ?user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: user.into(),
        }),
    ))
}

// ─── Credential Login ────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// User fields echoed after login; derived from the identity claim.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<IdentityClaim> for SessionUser {
    fn from(claim: IdentityClaim) -> Self {
        Self {
            id: claim.id.to_hex(),
            email: claim.email,
            name: claim.name,
            image: claim.image,
        }
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: SessionUser,
}

/// Verify credentials and set the session cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let claim = verify_credentials(&state.store, &body.email, &body.password).await?;
    let token = state.session_keys.issue(claim.id, &claim.email)?;

    tracing::info!(user_id = %claim.id, "Login successful");

    let jar = jar.add(session_cookie(token, cookie_secure(&state)));

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: claim.into(),
        }),
    ))
}

// ─── Session Inspection ──────────────────────────────────────

#[derive(Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

/// Return the profile behind the current session.
async fn me(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<MeResponse>> {
    let auth_user = session_from_request(&state, &jar, &headers)?;

    let user = state
        .store
        .find_user_by_id(auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse { user: user.into() }))
}

/// Clear the session cookie. The token itself stays valid until expiry;
/// there is no server-side revocation.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.add(clear_session_cookie(cookie_secure(&state)));
    (jar, StatusCode::NO_CONTENT)
}

// ─── Google External Identity ────────────────────────────────

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Sign the frontend redirect target into an opaque OAuth state value.
fn sign_state(frontend_url: &str, secret: &[u8]) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    // Data payload: "frontend_url|timestamp_hex"
    let payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify the HMAC signature and decode the frontend URL from the OAuth
/// state parameter.
fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let frontend_url = parts[0];
    let timestamp_hex = parts[1];
    let signature_hex = parts[2];

    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());

    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected_signature {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    Some(frontend_url.to_string())
}

/// Callback URL derived from the request host.
fn callback_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:8080");

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/auth/google/callback", scheme, host)
}

/// Start the Google sign-in flow.
async fn google_start(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Redirect> {
    let google = state.google.as_ref().ok_or_else(|| {
        AppError::Unavailable("Google sign-in is not configured".to_string())
    })?;

    let oauth_state = sign_state(&state.config.frontend_url, &state.config.session_secret)?;
    let auth_url = google.authorize_url(&callback_url(&headers), &oauth_state);

    tracing::info!("Starting Google OAuth flow");

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// Google callback: exchange the code, upsert the user, set the session
/// cookie, and send the browser back to the frontend.
async fn google_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    let google = state.google.as_ref().ok_or_else(|| {
        AppError::Unavailable("Google sign-in is not configured".to_string())
    })?;

    let frontend_url = verify_and_decode_state(&params.state, &state.config.session_secret)
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or tampered state parameter, falling back to default frontend URL"
            );
            state.config.frontend_url.clone()
        });

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Google");
        let redirect = format!("{}/login?error={}", frontend_url, urlencoding::encode(&error));
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let code = params.code.ok_or_else(|| {
        AppError::InvalidInput("Missing authorization code".to_string())
    })?;

    let profile = google.exchange_code(&code, &callback_url(&headers)).await?;

    let user = state
        .store
        .upsert_external_user(
            &profile.email.to_lowercase(),
            &profile.name,
            profile.picture.as_deref(),
            &now_rfc3339(),
        )
        .await?;

    let user_id = user
        .id
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Stored user is missing an id")))?;

    tracing::info!(user_id = %user_id, "Google sign-in successful");

    let token = state.session_keys.issue(user_id, &user.email)?;
    let jar = jar.add(session_cookie(token, cookie_secure(&state)));

    Ok((jar, Redirect::temporary(&frontend_url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        let secret = b"secret_key";
        let frontend_url = "https://example.com";

        let encoded = sign_state(frontend_url, secret).unwrap();
        let decoded = verify_and_decode_state(&encoded, secret);

        assert_eq!(decoded, Some(frontend_url.to_string()));
    }

    #[test]
    fn test_state_rejects_wrong_secret() {
        let encoded = sign_state("https://example.com", b"secret_key").unwrap();
        assert_eq!(verify_and_decode_state(&encoded, b"wrong_key"), None);
    }

    #[test]
    fn test_state_rejects_tampered_signature() {
        let secret = b"secret_key";
        let payload = "https://example.com|1234abcd";
        let state_data = format!("{}|{}", payload, "invalid_signature");
        let encoded = URL_SAFE_NO_PAD.encode(state_data.as_bytes());

        assert_eq!(verify_and_decode_state(&encoded, secret), None);
    }

    #[test]
    fn test_state_rejects_malformed_input() {
        let secret = b"secret_key";
        let encoded = URL_SAFE_NO_PAD.encode("invalid|format");
        assert_eq!(verify_and_decode_state(&encoded, secret), None);

        assert_eq!(verify_and_decode_state("not-base64!!!", secret), None);
    }
}
