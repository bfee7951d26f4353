// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community model for storage and API.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Community category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunityCategory {
    Fitness,
    Nutrition,
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    General,
}

/// Stored community record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::models::serialize_opt_object_id"
    )]
    pub id: Option<ObjectId>,
    /// Unique community name
    pub name: String,
    pub description: String,
    pub category: CommunityCategory,
    /// Creating user (hex id)
    pub creator: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub moderators: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
    pub is_private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Community {
    /// Creator and moderators may modify or delete the community.
    pub fn can_moderate(&self, user: &str) -> bool {
        self.creator == user || self.moderators.iter().any(|m| m == user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_moderate() {
        let creator = ObjectId::new().to_hex();
        let moderator = ObjectId::new().to_hex();
        let member = ObjectId::new().to_hex();

        let community = Community {
            id: None,
            name: "Morning Runners".to_string(),
            description: "Early birds".to_string(),
            category: CommunityCategory::Fitness,
            creator: creator.clone(),
            members: vec![creator.clone(), moderator.clone(), member.clone()],
            moderators: vec![creator.clone(), moderator.clone()],
            rules: vec![],
            is_private: false,
            image: None,
            cover_image: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        };

        assert!(community.can_moderate(&creator));
        assert!(community.can_moderate(&moderator));
        assert!(!community.can_moderate(&member));
    }
}
