// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-scoped document store client.
//!
//! Exactly one client is dialed per process and reused by every request;
//! the driver pools physical connections internally. Concurrent first
//! callers share a single in-flight dial, and a failed dial leaves the
//! cell empty so a later call can retry.

use mongodb::{bson::doc, Client};
use tokio::sync::OnceCell;

use crate::error::AppError;

static SHARED_CLIENT: OnceCell<Client> = OnceCell::const_new();

/// Get the shared client, dialing on first use.
///
/// The URI is only consulted on the dial that wins; once a client is
/// cached, subsequent calls return it without re-dialing.
pub async fn shared_client(uri: &str) -> Result<&'static Client, AppError> {
    SHARED_CLIENT
        .get_or_try_init(|| async {
            let client = Client::with_uri_str(uri).await.map_err(|e| {
                AppError::Unavailable(format!("Failed to connect to document store: {}", e))
            })?;

            // The driver connects lazily; ping so a bad URI fails at
            // startup instead of on the first request.
            client
                .database("admin")
                .run_command(doc! { "ping": 1 })
                .await
                .map_err(|e| {
                    AppError::Unavailable(format!("Document store ping failed: {}", e))
                })?;

            tracing::info!("Connected to document store");
            Ok(client)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_dial_is_retryable() {
        // A malformed URI must propagate an error and must not poison the
        // cell: the second call runs a fresh attempt instead of returning
        // a cached failure.
        let first = shared_client("not-a-valid-uri").await;
        assert!(matches!(first, Err(AppError::Unavailable(_))));

        let second = shared_client("also-not-a-valid-uri").await;
        assert!(matches!(second, Err(AppError::Unavailable(_))));
    }
}
