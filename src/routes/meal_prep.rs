// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Meal-prep plan routes. Plans are personal: every operation is scoped
//! to the session user.

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
use crate::models::meal_prep::{MealPrep, MealPrepStatus, MealPrepStep};
use crate::routes::{page_params, parse_object_id, MessageResponse, Pagination};
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/meal-prep", get(list_meal_preps).post(create_meal_prep))
        .route(
            "/api/meal-prep/{id}",
            get(get_meal_prep)
                .patch(update_meal_prep)
                .put(update_meal_prep)
                .delete(delete_meal_prep),
        )
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealPrepRequest {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    title: String,
    #[validate(length(min = 1, max = 2000, message = "description is required"))]
    description: String,
    #[validate(length(min = 1, message = "totalTime is required"))]
    total_time: String,
    #[validate(length(min = 1, message = "scheduledDate is required"))]
    scheduled_date: String,
    #[serde(default)]
    steps: Vec<MealPrepStep>,
    #[serde(default)]
    status: Option<MealPrepStatus>,
}

async fn create_meal_prep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<CreateMealPrepRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MealPrep>)> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate().map_err(AppError::from_validation)?;

    let now = now_rfc3339();
    let plan = state
        .store
        .insert_meal_prep(MealPrep {
            id: None,
            user_id: Some(user.id.to_hex()),
            title: body.title.trim().to_string(),
            description: body.description.trim().to_string(),
            total_time: body.total_time,
            scheduled_date: body.scheduled_date,
            steps: body.steps,
            status: body.status.unwrap_or(MealPrepStatus::Planned),
            created_at: now.clone(),
            updated_at: now,
        })
        .await?;

    tracing::info!(plan_id = ?plan.id, user_id = %user.id, "Meal-prep plan created");

    Ok((StatusCode::CREATED, Json(plan)))
}

#[derive(Deserialize)]
pub struct ListMealPrepsQuery {
    status: Option<String>,
    #[serde(default = "crate::routes::default_page")]
    page: u32,
    #[serde(default = "crate::routes::default_limit")]
    limit: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPrepsResponse {
    pub meal_preps: Vec<MealPrep>,
    pub pagination: Pagination,
}

async fn list_meal_preps(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListMealPrepsQuery>,
) -> Result<Json<MealPrepsResponse>> {
    let (page, limit) = page_params(params.page, params.limit)?;

    let (meal_preps, total) = state
        .store
        .list_meal_preps(&user.id.to_hex(), params.status.as_deref(), page, limit)
        .await?;

    Ok(Json(MealPrepsResponse {
        meal_preps,
        pagination: Pagination::new(total, page, limit),
    }))
}

/// Fetch a plan and enforce ownership. Plans stored before ownership
/// existed have no user and stay open to any session.
async fn fetch_owned_meal_prep(
    state: &AppState,
    user: &AuthUser,
    raw_id: &str,
) -> Result<(mongodb::bson::oid::ObjectId, MealPrep)> {
    let id = parse_object_id(raw_id)?;

    let plan = state
        .store
        .find_meal_prep(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal preparation not found".to_string()))?;

    if let Some(owner) = plan.user_id.as_deref() {
        if owner != user.id.to_hex() {
            return Err(AppError::Forbidden);
        }
    }

    Ok((id, plan))
}

async fn get_meal_prep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MealPrep>> {
    let (_, plan) = fetch_owned_meal_prep(&state, &user, &id).await?;
    Ok(Json(plan))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealPrepRequest {
    #[validate(length(min = 1, max = 200, message = "title cannot be empty"))]
    title: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "description cannot be empty"))]
    description: Option<String>,
    total_time: Option<String>,
    scheduled_date: Option<String>,
    steps: Option<Vec<MealPrepStep>>,
    status: Option<MealPrepStatus>,
}

async fn update_meal_prep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateMealPrepRequest>, JsonRejection>,
) -> Result<Json<MealPrep>> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate().map_err(AppError::from_validation)?;

    let (id, mut plan) = fetch_owned_meal_prep(&state, &user, &id).await?;

    if let Some(title) = body.title {
        plan.title = title.trim().to_string();
    }
    if let Some(description) = body.description {
        plan.description = description.trim().to_string();
    }
    if let Some(total_time) = body.total_time {
        plan.total_time = total_time;
    }
    if let Some(scheduled_date) = body.scheduled_date {
        plan.scheduled_date = scheduled_date;
    }
    if let Some(steps) = body.steps {
        plan.steps = steps;
    }
    if let Some(status) = body.status {
        plan.status = status;
    }
    plan.updated_at = now_rfc3339();

    state.store.replace_meal_prep(id, &plan).await?;

    Ok(Json(plan))
}

async fn delete_meal_prep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let (id, _) = fetch_owned_meal_prep(&state, &user, &id).await?;

    if !state.store.delete_meal_prep(id).await? {
        return Err(AppError::NotFound(
            "Meal preparation not found".to_string(),
        ));
    }

    tracing::info!(plan_id = %id, user_id = %user.id, "Meal-prep plan deleted");

    Ok(Json(MessageResponse {
        message: "Meal preparation deleted successfully".to_string(),
    }))
}
