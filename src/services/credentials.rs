// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential verifier: authenticates an email/password pair against
//! stored identity records.
//!
//! Every failure mode after the input check collapses into the same
//! generic `AuthenticationFailed` so responses never reveal whether an
//! email is registered.

use anyhow::anyhow;
use mongodb::bson::oid::ObjectId;

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::User;

/// Minimal identity produced by a successful verification.
///
/// Never carries the password hash.
#[derive(Debug, Clone)]
pub struct IdentityClaim {
    pub id: ObjectId,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
}

/// Authenticate an email/password pair.
pub async fn verify_credentials(
    store: &DocumentStore,
    email: &str,
    password: &str,
) -> Result<IdentityClaim> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    }

    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::AuthenticationFailed)?;

    check_password(&user, password)
}

/// Compare a supplied password against a user's stored hash.
///
/// Users without a hash were created through an external sign-in and
/// cannot log in with a password.
fn check_password(user: &User, password: &str) -> Result<IdentityClaim> {
    let hash = user
        .password_hash
        .as_deref()
        .ok_or(AppError::AuthenticationFailed)?;

    let matches = bcrypt::verify(password, hash)
        .map_err(|e| AppError::Internal(anyhow!("Password verification failed: {}", e)))?;

    if !matches {
        return Err(AppError::AuthenticationFailed);
    }

    let id = user
        .id
        .ok_or_else(|| AppError::Internal(anyhow!("Stored user is missing an id")))?;

    Ok(IdentityClaim {
        id,
        email: user.email.clone(),
        name: user.name.clone(),
        image: user.image.clone(),
    })
}

/// Hash a password for storage. Cost factor is fixed at creation time.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(anyhow!("Password hashing failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_hash(hash: Option<String>) -> User {
        User {
            id: Some(ObjectId::new()),
            email: "runner@example.com".to_string(),
            name: "Runner".to_string(),
            password_hash: hash,
            image: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_correct_password_yields_claim() {
        let hash = bcrypt::hash("hunter2hunter2", 4).unwrap();
        let user = user_with_hash(Some(hash));

        let claim = check_password(&user, "hunter2hunter2").unwrap();
        assert_eq!(claim.email, "runner@example.com");
        assert_eq!(claim.name, "Runner");
    }

    #[test]
    fn test_wrong_password_is_generic_failure() {
        let hash = bcrypt::hash("hunter2hunter2", 4).unwrap();
        let user = user_with_hash(Some(hash));

        let err = check_password(&user, "wrong-password").unwrap_err();
        assert!(matches!(err, AppError::AuthenticationFailed));
    }

    #[test]
    fn test_external_identity_cannot_password_login() {
        // No stored hash: the account came from an external sign-in.
        let user = user_with_hash(None);

        let err = check_password(&user, "any-password").unwrap_err();
        assert!(matches!(err, AppError::AuthenticationFailed));
    }
}
