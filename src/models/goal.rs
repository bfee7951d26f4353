// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness goal model for storage and API.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Goal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalCategory {
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Muscle Gain")]
    MuscleGain,
    Cardio,
    Strength,
    Nutrition,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    Other,
}

/// Goal lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "Behind Schedule")]
    BehindSchedule,
    Completed,
    Abandoned,
}

/// Intermediate checkpoint toward the target value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub value: f64,
    #[serde(default)]
    pub achieved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_date: Option<String>,
}

/// Reminder frequency for a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    Daily,
    Weekly,
    Monthly,
    None,
}

/// Reminder settings attached to a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub frequency: ReminderFrequency,
    pub time: String,
    pub enabled: bool,
}

impl Default for Reminders {
    fn default() -> Self {
        Self {
            frequency: ReminderFrequency::None,
            time: "09:00".to_string(),
            enabled: false,
        }
    }
}

/// Stored goal record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::models::serialize_opt_object_id"
    )]
    pub id: Option<ObjectId>,
    /// Owning user (hex id)
    pub user: String,
    pub title: String,
    pub description: String,
    pub category: GoalCategory,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub start_date: String,
    pub target_date: String,
    pub status: GoalStatus,
    /// Percentage toward the target, always within [0, 100]
    pub progress: f64,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub reminders: Reminders,
    pub is_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Goal {
    /// Recompute `progress` from the current and target values, capping at
    /// 100 regardless of how far past the target the current value runs.
    ///
    /// Crossing 100 marks the goal completed; `completed_at` is the RFC3339
    /// timestamp recorded the first time that happens.
    pub fn recompute_progress(&mut self, completed_at: &str) {
        if self.target_value > 0.0 {
            self.progress = ((self.current_value / self.target_value) * 100.0).clamp(0.0, 100.0);
        }

        if self.progress >= 100.0 && !self.is_completed {
            self.is_completed = true;
            self.completed_date = Some(completed_at.to_string());
            self.status = GoalStatus::Completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(current: f64, target: f64) -> Goal {
        Goal {
            id: None,
            user: ObjectId::new().to_hex(),
            title: "Run 5k".to_string(),
            description: "Couch to 5k".to_string(),
            category: GoalCategory::Cardio,
            target_value: target,
            current_value: current,
            unit: "km".to_string(),
            start_date: "2024-01-01".to_string(),
            target_date: "2024-06-01".to_string(),
            status: GoalStatus::InProgress,
            progress: 0.0,
            milestones: vec![],
            reminders: Reminders::default(),
            is_completed: false,
            completed_date: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_progress_caps_at_100() {
        let mut g = goal(500.0, 5.0);
        g.recompute_progress("2024-02-01T00:00:00Z");
        assert_eq!(g.progress, 100.0);
        assert!(g.is_completed);
        assert_eq!(g.status, GoalStatus::Completed);
        assert_eq!(g.completed_date.as_deref(), Some("2024-02-01T00:00:00Z"));
    }

    #[test]
    fn test_progress_exact_target_completes() {
        let mut g = goal(5.0, 5.0);
        g.recompute_progress("2024-02-01T00:00:00Z");
        assert_eq!(g.progress, 100.0);
        assert!(g.is_completed);
    }

    #[test]
    fn test_progress_partial() {
        let mut g = goal(2.5, 5.0);
        g.recompute_progress("2024-02-01T00:00:00Z");
        assert_eq!(g.progress, 50.0);
        assert!(!g.is_completed);
        assert_eq!(g.status, GoalStatus::InProgress);
        assert!(g.completed_date.is_none());
    }

    #[test]
    fn test_completed_date_not_overwritten() {
        let mut g = goal(6.0, 5.0);
        g.recompute_progress("2024-02-01T00:00:00Z");
        g.current_value = 7.0;
        g.recompute_progress("2024-03-01T00:00:00Z");
        assert_eq!(g.completed_date.as_deref(), Some("2024-02-01T00:00:00Z"));
    }

    #[test]
    fn test_status_serializes_with_spaces() {
        let status = serde_json::to_value(GoalStatus::InProgress).unwrap();
        assert_eq!(status, serde_json::json!("In Progress"));

        let category = serde_json::to_value(GoalCategory::WeightLoss).unwrap();
        assert_eq!(category, serde_json::json!("Weight Loss"));
    }
}
