//! Workout plan model for storage and API.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Workout difficulty rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Single exercise within a workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    /// Rep description, e.g. "8-12" or "to failure"
    pub reps: String,
    /// Rest between sets, e.g. "60s"
    pub rest: String,
}

/// Stored workout record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::models::serialize_opt_object_id"
    )]
    pub id: Option<ObjectId>,
    /// Creator (hex id); None for seed data imported before ownership existed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Duration description, e.g. "45 min"
    pub duration: String,
    pub frequency: String,
    pub category: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub created_at: String,
    pub updated_at: String,
}
