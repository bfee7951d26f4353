// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community routes. Names are unique; mutation is restricted to the
//! creator and moderators.

use anyhow::anyhow;
use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::community::{Community, CommunityCategory};
use crate::routes::{page_params, parse_object_id, MessageResponse, Pagination};
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/communities",
            get(list_communities).post(create_community),
        )
        .route(
            "/api/communities/{id}",
            get(get_community)
                .patch(update_community)
                .delete(delete_community),
        )
        .route("/api/communities/{id}/join", post(join_community))
        .route("/api/communities/{id}/leave", post(leave_community))
}

// ─── Create ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityRequest {
    #[validate(length(min = 3, max = 50, message = "name must be 3-50 characters"))]
    name: String,
    #[validate(length(min = 1, max = 500, message = "description is required and cannot exceed 500 characters"))]
    description: String,
    category: CommunityCategory,
    #[serde(default)]
    is_private: bool,
    #[serde(default)]
    rules: Vec<String>,
    #[validate(url(message = "image must be a valid URL"))]
    image: Option<String>,
    #[validate(url(message = "coverImage must be a valid URL"))]
    cover_image: Option<String>,
}

/// Create a community; the creator becomes the first member and
/// moderator.
async fn create_community(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<CreateCommunityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Community>)> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate().map_err(AppError::from_validation)?;

    let name = body.name.trim().to_string();

    if state.store.find_community_by_name(&name).await?.is_some() {
        return Err(AppError::Conflict(
            "Community with this name already exists".to_string(),
        ));
    }

    let now = now_rfc3339();
    let community = state
        .store
        .insert_community(Community {
            id: None,
            name,
            description: body.description.trim().to_string(),
            category: body.category,
            creator: user.id.to_hex(),
            members: vec![user.id.to_hex()],
            moderators: vec![user.id.to_hex()],
            rules: body.rules,
            is_private: body.is_private,
            image: body.image,
            cover_image: body.cover_image,
            created_at: now.clone(),
            updated_at: now,
        })
        .await?;

    tracing::info!(community_id = ?community.id, user_id = %user.id, "Community created");

    Ok((StatusCode::CREATED, Json(community)))
}

// ─── List / Get ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListCommunitiesQuery {
    category: Option<String>,
    /// Case-insensitive substring over name and description
    query: Option<String>,
    #[serde(default = "crate::routes::default_page")]
    page: u32,
    #[serde(default = "crate::routes::default_limit")]
    limit: u32,
}

#[derive(Serialize)]
pub struct CommunitiesResponse {
    pub communities: Vec<Community>,
    pub pagination: Pagination,
}

async fn list_communities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListCommunitiesQuery>,
) -> Result<Json<CommunitiesResponse>> {
    let (page, limit) = page_params(params.page, params.limit)?;

    let (communities, total) = state
        .store
        .list_communities(
            params.category.as_deref(),
            params.query.as_deref(),
            page,
            limit,
        )
        .await?;

    Ok(Json(CommunitiesResponse {
        communities,
        pagination: Pagination::new(total, page, limit),
    }))
}

async fn get_community(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Community>> {
    let id = parse_object_id(&id)?;

    let community = state
        .store
        .find_community(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Community not found".to_string()))?;

    Ok(Json(community))
}

// ─── Update / Delete ─────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommunityRequest {
    #[validate(length(min = 1, max = 500, message = "description cannot be empty"))]
    description: Option<String>,
    category: Option<CommunityCategory>,
    is_private: Option<bool>,
    rules: Option<Vec<String>>,
    #[validate(url(message = "image must be a valid URL"))]
    image: Option<String>,
    #[validate(url(message = "coverImage must be a valid URL"))]
    cover_image: Option<String>,
}

/// Update community settings. The name is fixed at creation.
async fn update_community(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateCommunityRequest>, JsonRejection>,
) -> Result<Json<Community>> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate().map_err(AppError::from_validation)?;

    let (id, _) = fetch_moderated_community(&state, &user, &id).await?;

    let mut set = doc! { "updatedAt": now_rfc3339() };
    if let Some(description) = body.description {
        set.insert("description", description.trim());
    }
    if let Some(category) = body.category {
        let value = mongodb::bson::to_bson(&category)
            .map_err(|e| AppError::Internal(anyhow!("Category encoding failed: {}", e)))?;
        set.insert("category", value);
    }
    if let Some(is_private) = body.is_private {
        set.insert("isPrivate", is_private);
    }
    if let Some(rules) = body.rules {
        set.insert("rules", rules);
    }
    if let Some(image) = body.image {
        set.insert("image", image);
    }
    if let Some(cover_image) = body.cover_image {
        set.insert("coverImage", cover_image);
    }

    let updated = state
        .store
        .update_community(id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Community not found".to_string()))?;

    Ok(Json(updated))
}

/// Fetch a community and require moderation rights.
async fn fetch_moderated_community(
    state: &AppState,
    user: &AuthUser,
    raw_id: &str,
) -> Result<(mongodb::bson::oid::ObjectId, Community)> {
    let id = parse_object_id(raw_id)?;

    let community = state
        .store
        .find_community(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Community not found".to_string()))?;

    if !community.can_moderate(&user.id.to_hex()) {
        return Err(AppError::Forbidden);
    }

    Ok((id, community))
}

async fn delete_community(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let (id, _) = fetch_moderated_community(&state, &user, &id).await?;

    if !state.store.delete_community(id).await? {
        return Err(AppError::NotFound("Community not found".to_string()));
    }

    tracing::info!(community_id = %id, user_id = %user.id, "Community deleted");

    Ok(Json(MessageResponse {
        message: "Community deleted successfully".to_string(),
    }))
}

// ─── Membership ──────────────────────────────────────────────

async fn join_community(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_object_id(&id)?;

    if !state.store.add_member(id, &user.id.to_hex()).await? {
        return Err(AppError::NotFound("Community not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Joined community".to_string(),
    }))
}

async fn leave_community(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_object_id(&id)?;

    let community = state
        .store
        .find_community(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Community not found".to_string()))?;

    // The creator cannot abandon their own community.
    if community.creator == user.id.to_hex() {
        return Err(AppError::InvalidInput(
            "The creator cannot leave their community".to_string(),
        ));
    }

    state.store.remove_member(id, &user.id.to_hex()).await?;

    Ok(Json(MessageResponse {
        message: "Left community".to_string(),
    }))
}
