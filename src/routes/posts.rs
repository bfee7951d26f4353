// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community feed routes: posts and their comments.
//!
//! Post creation accepts multipart form data so the client can attach
//! image files; only the file names are recorded, no binary storage.

use anyhow::anyhow;
use axum::extract::rejection::JsonRejection;
use axum::extract::Multipart;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, FieldViolation, Result};
use crate::middleware::auth::AuthUser;
use crate::models::post::{Comment, Post, PostCategory};
use crate::routes::{page_params, parse_object_id, MessageResponse, Pagination};
use crate::time_utils::now_rfc3339;
use crate::AppState;

const MAX_TITLE_LEN: usize = 200;
const MAX_CONTENT_LEN: usize = 5000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/{id}",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .route(
            "/api/posts/{id}/comments",
            get(list_comments).post(create_comment),
        )
}

// ─── Create (multipart) ──────────────────────────────────────

#[derive(Default)]
struct PostForm {
    title: String,
    content: String,
    category: Option<String>,
    tags: Vec<String>,
    images: Vec<String>,
}

/// Drain the multipart body into a form, keeping only file names for
/// image parts.
async fn read_post_form(mut multipart: Multipart) -> Result<PostForm> {
    let mut form = PostForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = read_text(field).await?,
            "content" => form.content = read_text(field).await?,
            "category" => form.category = Some(read_text(field).await?),
            // Comma-separated on the wire
            "tags" => {
                form.tags = read_text(field)
                    .await?
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "images" | "image" => {
                if let Some(file_name) = field.file_name() {
                    form.images.push(file_name.to_string());
                }
                // Discard the bytes; attachments are recorded by name only.
                let _ = field.bytes().await;
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart field: {}", e)))
}

/// Check the assembled form, reporting every violated field at once.
fn validate_post_form(form: &PostForm) -> Result<PostCategory> {
    let mut violations = Vec::new();

    if form.title.trim().is_empty() || form.title.len() > MAX_TITLE_LEN {
        violations.push(FieldViolation {
            field: "title".to_string(),
            message: format!("title is required and cannot exceed {} characters", MAX_TITLE_LEN),
        });
    }
    if form.content.trim().is_empty() || form.content.len() > MAX_CONTENT_LEN {
        violations.push(FieldViolation {
            field: "content".to_string(),
            message: format!(
                "content is required and cannot exceed {} characters",
                MAX_CONTENT_LEN
            ),
        });
    }

    let category = match form.category.as_deref() {
        None | Some("") => PostCategory::General,
        Some(raw) => raw.parse::<PostCategory>().unwrap_or_else(|_| {
            violations.push(FieldViolation {
                field: "category".to_string(),
                message: "category must be one of progress, meal, workout, general".to_string(),
            });
            PostCategory::General
        }),
    };

    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    Ok(category)
}

async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Post>)> {
    let form = read_post_form(multipart).await?;
    let category = validate_post_form(&form)?;

    let now = now_rfc3339();
    let post = state
        .store
        .insert_post(Post {
            id: None,
            author: user.id.to_hex(),
            title: form.title.trim().to_string(),
            content: form.content.trim().to_string(),
            category,
            tags: form.tags,
            images: form.images,
            likes: vec![],
            is_published: true,
            created_at: now.clone(),
            updated_at: now,
        })
        .await?;

    tracing::info!(post_id = ?post.id, user_id = %user.id, "Post created");

    Ok((StatusCode::CREATED, Json(post)))
}

// ─── List / Get ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListPostsQuery {
    category: Option<String>,
    #[serde(default = "crate::routes::default_page")]
    page: u32,
    #[serde(default = "crate::routes::default_limit")]
    limit: u32,
}

#[derive(Serialize)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListPostsQuery>,
) -> Result<Json<PostsResponse>> {
    let (page, limit) = page_params(params.page, params.limit)?;

    let (posts, total) = state
        .store
        .list_posts(params.category.as_deref(), page, limit)
        .await?;

    Ok(Json(PostsResponse {
        posts,
        pagination: Pagination::new(total, page, limit),
    }))
}

async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Post>> {
    let id = parse_object_id(&id)?;

    let post = state
        .store
        .find_post(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

// ─── Update / Delete ─────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "title cannot be empty"))]
    title: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "content cannot be empty"))]
    content: Option<String>,
    category: Option<PostCategory>,
    tags: Option<Vec<String>>,
}

async fn update_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<Post>> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate().map_err(AppError::from_validation)?;

    let id = parse_object_id(&id)?;
    let post = state
        .store
        .find_post(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.author != user.id.to_hex() {
        return Err(AppError::Forbidden);
    }

    let mut set = doc! { "updatedAt": now_rfc3339() };
    if let Some(title) = body.title {
        set.insert("title", title.trim());
    }
    if let Some(content) = body.content {
        set.insert("content", content.trim());
    }
    if let Some(category) = body.category {
        let value = mongodb::bson::to_bson(&category)
            .map_err(|e| AppError::Internal(anyhow!("Category encoding failed: {}", e)))?;
        set.insert("category", value);
    }
    if let Some(tags) = body.tags {
        set.insert("tags", tags);
    }

    let updated = state
        .store
        .update_post(id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(Json(updated))
}

async fn delete_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_object_id(&id)?;
    let post = state
        .store
        .find_post(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.author != user.id.to_hex() {
        return Err(AppError::Forbidden);
    }

    if !state.store.delete_post(id).await? {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    // Best-effort cleanup; the post itself is already gone.
    match state.store.delete_comments_for_post(&id.to_hex()).await {
        Ok(count) => {
            tracing::info!(post_id = %id, comments = count, "Post deleted");
        }
        Err(e) => {
            tracing::warn!(post_id = %id, error = %e, "Failed to delete comments for post");
        }
    }

    Ok(Json(MessageResponse {
        message: "Post deleted successfully".to_string(),
    }))
}

// ─── Comments ────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "content is required and cannot exceed 1000 characters"))]
    content: String,
}

async fn create_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>)> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate().map_err(AppError::from_validation)?;

    let post_id = parse_object_id(&id)?;
    if state.store.find_post(post_id).await?.is_none() {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    let now = now_rfc3339();
    let comment = state
        .store
        .insert_comment(Comment {
            id: None,
            author: user.id.to_hex(),
            post: post_id.to_hex(),
            content: body.content.trim().to_string(),
            likes: vec![],
            is_edited: false,
            created_at: now.clone(),
            updated_at: now,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

#[derive(Deserialize)]
pub struct ListCommentsQuery {
    #[serde(default = "crate::routes::default_page")]
    page: u32,
    #[serde(default = "crate::routes::default_limit")]
    limit: u32,
}

#[derive(Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
    pub pagination: Pagination,
}

async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ListCommentsQuery>,
) -> Result<Json<CommentsResponse>> {
    let post_id = parse_object_id(&id)?;
    let (page, limit) = page_params(params.page, params.limit)?;

    let (comments, total) = state
        .store
        .list_comments(&post_id.to_hex(), page, limit)
        .await?;

    Ok(Json(CommentsResponse {
        comments,
        pagination: Pagination::new(total, page, limit),
    }))
}
