//! Meal-prep plan model for storage and API.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Meal-prep plan lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealPrepStatus {
    Planned,
    InProgress,
    Completed,
}

/// Single preparation step within a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPrepStep {
    pub step: String,
    /// Duration description, e.g. "20 min"
    pub duration: String,
    #[serde(default)]
    pub tasks: Vec<String>,
    pub tips: String,
    pub icon: String,
}

/// Stored meal-prep plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPrep {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::models::serialize_opt_object_id"
    )]
    pub id: Option<ObjectId>,
    /// Owning user (hex id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub title: String,
    pub description: String,
    pub total_time: String,
    pub scheduled_date: String,
    #[serde(default)]
    pub steps: Vec<MealPrepStep>,
    pub status: MealPrepStatus,
    pub created_at: String,
    pub updated_at: String,
}
