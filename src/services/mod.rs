// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod credentials;
pub mod google_oauth;
pub mod session;

pub use credentials::IdentityClaim;
pub use google_oauth::{GoogleOauth, GoogleProfile};
pub use session::{SessionClaims, SessionKeys};
