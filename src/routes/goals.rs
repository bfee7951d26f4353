// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness goal routes.

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::goal::{Goal, GoalCategory, GoalStatus, Milestone, Reminders};
use crate::routes::{page_params, parse_object_id, MessageResponse, Pagination};
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/goals", get(list_goals).post(create_goal))
        .route(
            "/api/goals/{id}",
            get(get_goal)
                .patch(update_goal)
                .put(update_goal)
                .delete(delete_goal),
        )
}

// ─── Create ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    #[validate(length(min = 3, max = 100, message = "title must be 3-100 characters"))]
    title: String,
    #[validate(length(max = 500, message = "description cannot exceed 500 characters"))]
    #[serde(default)]
    description: Option<String>,
    category: GoalCategory,
    #[validate(range(exclusive_min = 0.0, message = "targetValue must be greater than 0"))]
    target_value: f64,
    #[validate(length(min = 1, message = "unit is required"))]
    unit: String,
    #[serde(default)]
    start_date: Option<String>,
    target_date: String,
    #[serde(default)]
    milestones: Vec<Milestone>,
    #[serde(default)]
    reminders: Option<Reminders>,
}

/// Create a goal owned by the session user.
///
/// Tracking always starts from zero: progress is 0 and the status is
/// "In Progress" until the first value update arrives.
async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<CreateGoalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Goal>)> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate().map_err(AppError::from_validation)?;

    let now = now_rfc3339();
    let goal = state
        .store
        .insert_goal(Goal {
            id: None,
            user: user.id.to_hex(),
            title: body.title.trim().to_string(),
            description: body.description.unwrap_or_default().trim().to_string(),
            category: body.category,
            target_value: body.target_value,
            current_value: 0.0,
            unit: body.unit.trim().to_string(),
            start_date: body.start_date.unwrap_or_else(|| now.clone()),
            target_date: body.target_date,
            status: GoalStatus::InProgress,
            progress: 0.0,
            milestones: body.milestones,
            reminders: body.reminders.unwrap_or_default(),
            is_completed: false,
            completed_date: None,
            created_at: now.clone(),
            updated_at: now,
        })
        .await?;

    tracing::info!(goal_id = ?goal.id, user_id = %user.id, "Goal created");

    Ok((StatusCode::CREATED, Json(goal)))
}

// ─── List ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListGoalsQuery {
    category: Option<String>,
    status: Option<String>,
    #[serde(default = "crate::routes::default_page")]
    page: u32,
    #[serde(default = "crate::routes::default_limit")]
    limit: u32,
}

#[derive(Serialize)]
pub struct GoalsResponse {
    pub goals: Vec<Goal>,
    pub pagination: Pagination,
}

/// List the session user's goals, newest first.
async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListGoalsQuery>,
) -> Result<Json<GoalsResponse>> {
    let (page, limit) = page_params(params.page, params.limit)?;

    let (goals, total) = state
        .store
        .list_goals(
            &user.id.to_hex(),
            params.category.as_deref(),
            params.status.as_deref(),
            page,
            limit,
        )
        .await?;

    Ok(Json(GoalsResponse {
        goals,
        pagination: Pagination::new(total, page, limit),
    }))
}

// ─── Get ─────────────────────────────────────────────────────

/// Fetch one goal.
///
/// A goal owned by someone else answers 403, not 404: the ownership
/// check comes first, uniformly with updates and deletes.
async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Goal>> {
    let (_, goal) = fetch_owned_goal(&state, &user, &id).await?;
    Ok(Json(goal))
}

/// Fetch a goal and enforce ownership.
async fn fetch_owned_goal(
    state: &AppState,
    user: &AuthUser,
    raw_id: &str,
) -> Result<(mongodb::bson::oid::ObjectId, Goal)> {
    let id = parse_object_id(raw_id)?;

    let goal = state
        .store
        .find_goal(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Goal not found".to_string()))?;

    if goal.user != user.id.to_hex() {
        return Err(AppError::Forbidden);
    }

    Ok((id, goal))
}

// ─── Update ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    #[validate(length(min = 3, max = 100, message = "title must be 3-100 characters"))]
    title: Option<String>,
    #[validate(length(max = 500, message = "description cannot exceed 500 characters"))]
    description: Option<String>,
    category: Option<GoalCategory>,
    #[validate(range(exclusive_min = 0.0, message = "targetValue must be greater than 0"))]
    target_value: Option<f64>,
    #[validate(range(min = 0.0, message = "currentValue cannot be negative"))]
    current_value: Option<f64>,
    unit: Option<String>,
    start_date: Option<String>,
    target_date: Option<String>,
    status: Option<GoalStatus>,
    milestones: Option<Vec<Milestone>>,
    reminders: Option<Reminders>,
}

/// Partially update a goal, recomputing progress from the new values.
async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateGoalRequest>, JsonRejection>,
) -> Result<Json<Goal>> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate().map_err(AppError::from_validation)?;

    let (goal_id, mut goal) = fetch_owned_goal(&state, &user, &id).await?;

    if let Some(title) = body.title {
        goal.title = title.trim().to_string();
    }
    if let Some(description) = body.description {
        goal.description = description.trim().to_string();
    }
    if let Some(category) = body.category {
        goal.category = category;
    }
    if let Some(target_value) = body.target_value {
        goal.target_value = target_value;
    }
    if let Some(current_value) = body.current_value {
        goal.current_value = current_value;
    }
    if let Some(unit) = body.unit {
        goal.unit = unit.trim().to_string();
    }
    if let Some(start_date) = body.start_date {
        goal.start_date = start_date;
    }
    if let Some(target_date) = body.target_date {
        goal.target_date = target_date;
    }
    if let Some(status) = body.status {
        goal.status = status;
    }
    if let Some(milestones) = body.milestones {
        goal.milestones = milestones;
    }
    if let Some(reminders) = body.reminders {
        goal.reminders = reminders;
    }

    let now = now_rfc3339();
    goal.updated_at = now.clone();
    goal.recompute_progress(&now);

    state.store.replace_goal(goal_id, &goal).await?;

    Ok(Json(goal))
}

// ─── Delete ──────────────────────────────────────────────────

/// Delete a goal. A second delete of the same id answers 404.
async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let (goal_id, _) = fetch_owned_goal(&state, &user, &id).await?;

    if !state.store.delete_goal(goal_id).await? {
        return Err(AppError::NotFound("Goal not found".to_string()));
    }

    tracing::info!(goal_id = %goal_id, user_id = %user.id, "Goal deleted");

    Ok(Json(MessageResponse {
        message: "Goal deleted successfully".to_string(),
    }))
}
