// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.
//!
//! Reference fields (owners, authors, members) are stored and served as
//! hex id strings; only `_id` is a native ObjectId, assigned by the
//! store at insert.

use mongodb::bson::oid::ObjectId;
use serde::Serializer;

/// Serialize a document id as plain hex in API responses.
///
/// Insert paths always carry `None` (skipped), and replacements strip
/// the id, so this never reaches storage.
pub fn serialize_opt_object_id<S>(
    id: &Option<ObjectId>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}

pub mod community;
pub mod goal;
pub mod meal_prep;
pub mod post;
pub mod user;
pub mod workout;

pub use community::{Community, CommunityCategory};
pub use goal::{Goal, GoalCategory, GoalStatus};
pub use meal_prep::{MealPrep, MealPrepStatus};
pub use post::{Comment, Post, PostCategory};
pub use user::{User, UserResponse};
pub use workout::{Difficulty, Workout};
