// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session issuer: signed, time-bounded bearer tokens.
//!
//! Tokens are self-contained: validity is determined solely by the
//! signature and the embedded expiry. There is no server-side session
//! store, so revocation before expiry is not possible.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "auth-token";

/// Sessions expire 30 days after issuance.
pub const SESSION_LIFETIME_SECS: usize = 30 * 24 * 60 * 60;

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject (user id, hex)
    pub sub: String,
    /// Email at time of issuance
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a session token for a verified identity.
    pub fn issue(&self, user_id: ObjectId, email: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
            .as_secs() as usize;

        self.issue_at(user_id, email, now)
    }

    /// Issue a token as of a given instant. Split out so expiry-boundary
    /// tests can control the clock.
    pub fn issue_at(&self, user_id: ObjectId, email: &str, now: usize) -> Result<String> {
        let claims = SessionClaims {
            sub: user_id.to_hex(),
            email: email.to_string(),
            iat: now,
            exp: now + SESSION_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Token creation failed: {}", e)))
    }

    /// Verify a token and return the embedded claims.
    ///
    /// A signature mismatch or elapsed expiry both map to the same
    /// `InvalidSession`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidSession)
    }
}
