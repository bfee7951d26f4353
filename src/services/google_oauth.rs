// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth external identity sign-in.
//!
//! Exchanges an authorization code for an access token and fetches the
//! minimal profile used to upsert a passwordless user. The whole feature
//! is disabled when the client id/secret are not configured.

use anyhow::anyhow;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Google OAuth client.
#[derive(Clone)]
pub struct GoogleOauth {
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
}

/// Profile fields consumed from the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl GoogleOauth {
    /// Build the client when both credentials are configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        match (&config.google_client_id, &config.google_client_secret) {
            (Some(id), Some(secret)) => Some(Self {
                client_id: id.clone(),
                client_secret: secret.clone(),
                http: reqwest::Client::new(),
            }),
            _ => None,
        }
    }

    /// Authorization URL the browser is redirected to.
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope=openid%20email%20profile&state={}",
            AUTHORIZE_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            state
        )
    }

    /// Exchange an authorization code for the user's profile.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<GoogleProfile> {
        let token: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow!("Token exchange request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Internal(anyhow!("Token exchange rejected: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow!("Malformed token response: {}", e)))?;

        let profile: GoogleProfile = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow!("Userinfo request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::Internal(anyhow!("Userinfo rejected: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow!("Malformed userinfo response: {}", e)))?;

        Ok(profile)
    }
}
