// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plan routes. Workouts are listed as a shared library, but
//! only the creator may change or remove one.

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
use crate::models::workout::{Difficulty, Exercise, Workout};
use crate::routes::{page_params, parse_object_id, MessageResponse, Pagination};
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route(
            "/api/workouts/{id}",
            get(get_workout)
                .patch(update_workout)
                .put(update_workout)
                .delete(delete_workout),
        )
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    title: String,
    #[validate(length(min = 1, max = 2000, message = "description is required"))]
    description: String,
    difficulty: Difficulty,
    #[validate(length(min = 1, message = "duration is required"))]
    duration: String,
    #[serde(default)]
    frequency: Option<String>,
    #[validate(length(min = 1, message = "category is required"))]
    category: String,
    #[serde(default)]
    exercises: Vec<Exercise>,
}

async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<CreateWorkoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Workout>)> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate().map_err(AppError::from_validation)?;

    let now = now_rfc3339();
    let workout = state
        .store
        .insert_workout(Workout {
            id: None,
            created_by: Some(user.id.to_hex()),
            title: body.title.trim().to_string(),
            description: body.description.trim().to_string(),
            difficulty: body.difficulty,
            duration: body.duration,
            frequency: body.frequency.unwrap_or_else(|| "Weekly".to_string()),
            category: body.category,
            exercises: body.exercises,
            created_at: now.clone(),
            updated_at: now,
        })
        .await?;

    tracing::info!(workout_id = ?workout.id, user_id = %user.id, "Workout created");

    Ok((StatusCode::CREATED, Json(workout)))
}

#[derive(Deserialize)]
pub struct ListWorkoutsQuery {
    category: Option<String>,
    difficulty: Option<String>,
    #[serde(default = "crate::routes::default_page")]
    page: u32,
    #[serde(default = "crate::routes::default_limit")]
    limit: u32,
}

#[derive(Serialize)]
pub struct WorkoutsResponse {
    pub workouts: Vec<Workout>,
    pub pagination: Pagination,
}

async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListWorkoutsQuery>,
) -> Result<Json<WorkoutsResponse>> {
    let (page, limit) = page_params(params.page, params.limit)?;

    let (workouts, total) = state
        .store
        .list_workouts(
            params.category.as_deref(),
            params.difficulty.as_deref(),
            page,
            limit,
        )
        .await?;

    Ok(Json(WorkoutsResponse {
        workouts,
        pagination: Pagination::new(total, page, limit),
    }))
}

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Workout>> {
    let id = parse_object_id(&id)?;

    let workout = state
        .store
        .find_workout(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    Ok(Json(workout))
}

/// Only the creator may mutate a workout. Records imported before
/// ownership existed have no creator and stay open to any session.
fn check_workout_owner(workout: &Workout, user: &AuthUser) -> Result<()> {
    match workout.created_by.as_deref() {
        Some(owner) if owner != user.id.to_hex() => Err(AppError::Forbidden),
        _ => Ok(()),
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutRequest {
    #[validate(length(min = 1, max = 200, message = "title cannot be empty"))]
    title: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "description cannot be empty"))]
    description: Option<String>,
    difficulty: Option<Difficulty>,
    duration: Option<String>,
    frequency: Option<String>,
    category: Option<String>,
    exercises: Option<Vec<Exercise>>,
}

async fn update_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateWorkoutRequest>, JsonRejection>,
) -> Result<Json<Workout>> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate().map_err(AppError::from_validation)?;

    let id = parse_object_id(&id)?;
    let mut workout = state
        .store
        .find_workout(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    check_workout_owner(&workout, &user)?;

    if let Some(title) = body.title {
        workout.title = title.trim().to_string();
    }
    if let Some(description) = body.description {
        workout.description = description.trim().to_string();
    }
    if let Some(difficulty) = body.difficulty {
        workout.difficulty = difficulty;
    }
    if let Some(duration) = body.duration {
        workout.duration = duration;
    }
    if let Some(frequency) = body.frequency {
        workout.frequency = frequency;
    }
    if let Some(category) = body.category {
        workout.category = category;
    }
    if let Some(exercises) = body.exercises {
        workout.exercises = exercises;
    }
    workout.updated_at = now_rfc3339();

    state.store.replace_workout(id, &workout).await?;

    Ok(Json(workout))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_object_id(&id)?;
    let workout = state
        .store
        .find_workout(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    check_workout_owner(&workout, &user)?;

    if !state.store.delete_workout(id).await? {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }

    tracing::info!(workout_id = %id, user_id = %user.id, "Workout deleted");

    Ok(Json(MessageResponse {
        message: "Workout deleted successfully".to_string(),
    }))
}
