// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// A single schema violation, reported per field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("Invalid email or password")]
    AuthenticationFailed,

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("Not allowed to access this resource")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Collect every violated field from a `validator` run into one error.
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let mut violations = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for err in field_errors {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value for constraint `{}`", err.code));
                violations.push(FieldViolation {
                    field: field.to_string(),
                    message,
                });
            }
        }
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(violations)
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_input",
                Some(serde_json::Value::String(msg.clone())),
            ),
            AppError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                "validation_failed",
                serde_json::to_value(violations).ok(),
            ),
            // Deliberately generic: never reveal whether the email exists.
            AppError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                Some(serde_json::Value::String(
                    "Invalid email or password".to_string(),
                )),
            ),
            AppError::InvalidSession => (StatusCode::UNAUTHORIZED, "invalid_session", None),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", None),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "not_found",
                Some(serde_json::Value::String(msg.clone())),
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "conflict",
                Some(serde_json::Value::String(msg.clone())),
            ),
            AppError::Unavailable(msg) => {
                tracing::warn!(error = %msg, "Service unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable", None)
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
