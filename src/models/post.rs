// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community post and comment models for storage and API.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Post category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    Progress,
    Meal,
    Workout,
    General,
}

impl FromStr for PostCategory {
    type Err = ();

    // Multipart form fields arrive as plain strings, outside serde.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "progress" => Ok(Self::Progress),
            "meal" => Ok(Self::Meal),
            "workout" => Ok(Self::Workout),
            "general" => Ok(Self::General),
            _ => Err(()),
        }
    }
}

/// Stored post record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::models::serialize_opt_object_id"
    )]
    pub id: Option<ObjectId>,
    /// Authoring user (hex id)
    pub author: String,
    pub title: String,
    pub content: String,
    pub category: PostCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Attached image file names only; no binary storage
    #[serde(default)]
    pub images: Vec<String>,
    /// Users who liked the post (hex ids)
    #[serde(default)]
    pub likes: Vec<String>,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Stored comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::models::serialize_opt_object_id"
    )]
    pub id: Option<ObjectId>,
    pub author: String,
    pub post: String,
    pub content: String,
    #[serde(default)]
    pub likes: Vec<String>,
    pub is_edited: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!("meal".parse::<PostCategory>(), Ok(PostCategory::Meal));
        assert!("breakfast".parse::<PostCategory>().is_err());
    }
}
