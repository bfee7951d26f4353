// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wellness-Tracker API Server
//!
//! Serves the JSON API behind the wellness web application: user
//! accounts, sessions, fitness goals, workouts, meal-prep plans, and
//! the community feed.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wellness_tracker::{
    config::Config,
    db::DocumentStore,
    services::{GoogleOauth, SessionKeys},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Wellness-Tracker API");

    // Dial the document store once; every request reuses this handle
    let store = DocumentStore::connect(&config)
        .await
        .expect("Failed to connect to document store");

    let session_keys = SessionKeys::new(&config.session_secret);

    let google = GoogleOauth::from_config(&config);
    if google.is_none() {
        tracing::info!("Google sign-in disabled (client id/secret not configured)");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        session_keys,
        google,
    });

    // Build router
    let app = wellness_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wellness_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
