//! User identity record for storage and API.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// User identity stored in the `users` collection.
///
/// `password_hash` is absent for identities created through an external
/// sign-in and is never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::models::serialize_opt_object_id"
    )]
    pub id: Option<ObjectId>,
    /// Email address (unique, lowercased at registration)
    pub email: String,
    /// Display name
    pub name: String,
    /// bcrypt hash; None for external-identity users
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Profile image reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// When the account was created (RFC3339)
    pub created_at: String,
    /// Last profile update (RFC3339)
    pub updated_at: String,
}

/// User representation returned by the API. Never carries the hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            name: user.name,
            image: user.image,
            created_at: user.created_at,
        }
    }
}
