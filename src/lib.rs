// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wellness-Tracker: backend API for a consumer wellness application.
//!
//! This crate provides authentication, session handling, and CRUD
//! resource handlers for goals, workouts, meal-prep plans, posts, and
//! communities over a MongoDB document store.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::DocumentStore;
use services::{GoogleOauth, SessionKeys};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: DocumentStore,
    pub session_keys: SessionKeys,
    /// External identity sign-in; None when not configured
    pub google: Option<GoogleOauth>,
}
