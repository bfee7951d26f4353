// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document store wrapper with typed per-collection operations.
//!
//! Provides high-level operations for:
//! - Users (identity records)
//! - Goals, Workouts, Meal-prep plans (per-user fitness documents)
//! - Posts and Comments (community feed)
//! - Communities (membership groups)

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::db::{collections, connection};
use crate::error::AppError;
use crate::models::{Comment, Community, Goal, MealPrep, Post, User, Workout};

/// Document store client.
///
/// Cheap to clone; all clones share the process-wide connection.
#[derive(Clone)]
pub struct DocumentStore {
    db: Option<Database>,
}

impl DocumentStore {
    /// Connect to the configured database via the shared client.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let client = connection::shared_client(&config.mongodb_uri).await?;
        Ok(Self {
            db: Some(client.database(&config.database_name)),
        })
    }

    /// Create an offline store for testing.
    ///
    /// All database operations will return an error if called.
    pub fn new_offline() -> Self {
        Self { db: None }
    }

    /// Helper to get the database or return an error if offline.
    fn database(&self) -> Result<&Database, AppError> {
        self.db.as_ref().ok_or_else(|| {
            AppError::Unavailable("Document store not connected (offline mode)".to_string())
        })
    }

    fn users(&self) -> Result<Collection<User>, AppError> {
        Ok(self.database()?.collection(collections::USERS))
    }

    fn goals(&self) -> Result<Collection<Goal>, AppError> {
        Ok(self.database()?.collection(collections::GOALS))
    }

    fn workouts(&self) -> Result<Collection<Workout>, AppError> {
        Ok(self.database()?.collection(collections::WORKOUTS))
    }

    fn meal_preps(&self) -> Result<Collection<MealPrep>, AppError> {
        Ok(self.database()?.collection(collections::MEAL_PREPS))
    }

    fn posts(&self) -> Result<Collection<Post>, AppError> {
        Ok(self.database()?.collection(collections::POSTS))
    }

    fn comments(&self) -> Result<Collection<Comment>, AppError> {
        Ok(self.database()?.collection(collections::COMMENTS))
    }

    fn communities(&self) -> Result<Collection<Community>, AppError> {
        Ok(self.database()?.collection(collections::COMMUNITIES))
    }

    /// Fetch one page of a filtered collection plus the total match count.
    ///
    /// Sorted newest first; `page` is 1-indexed.
    async fn find_page<T>(
        coll: Collection<T>,
        filter: Document,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<T>, u64), AppError>
    where
        T: DeserializeOwned + Send + Sync + Unpin,
    {
        let total = coll.count_documents(filter.clone()).await?;

        let skip = u64::from(page.max(1) - 1) * u64::from(limit);
        let items = coll
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(i64::from(limit))
            .await?
            .try_collect()
            .await?;

        Ok((items, total))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Look up a user by exact email match.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users()?.find_one(doc! { "email": email }).await?)
    }

    /// Look up a user by id.
    pub async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users()?.find_one(doc! { "_id": id }).await?)
    }

    /// Store a new user, returning it with the assigned id.
    pub async fn insert_user(&self, mut user: User) -> Result<User, AppError> {
        let result = self.users()?.insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    /// Create or refresh an externally-authenticated user.
    ///
    /// Keyed by email; never touches `password_hash`, so a later external
    /// sign-in cannot lock a credentials user out of password login.
    pub async fn upsert_external_user(
        &self,
        email: &str,
        name: &str,
        image: Option<&str>,
        now: &str,
    ) -> Result<User, AppError> {
        if let Some(updated) = self
            .users()?
            .find_one_and_update(
                doc! { "email": email },
                doc! { "$set": { "name": name, "image": image, "updatedAt": now } },
            )
            .return_document(ReturnDocument::After)
            .await?
        {
            return Ok(updated);
        }

        self.insert_user(User {
            id: None,
            email: email.to_string(),
            name: name.to_string(),
            password_hash: None,
            image: image.map(str::to_string),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        })
        .await
    }

    // ─── Goal Operations ─────────────────────────────────────────

    pub async fn insert_goal(&self, mut goal: Goal) -> Result<Goal, AppError> {
        let result = self.goals()?.insert_one(&goal).await?;
        goal.id = result.inserted_id.as_object_id();
        Ok(goal)
    }

    pub async fn find_goal(&self, id: ObjectId) -> Result<Option<Goal>, AppError> {
        Ok(self.goals()?.find_one(doc! { "_id": id }).await?)
    }

    /// List one user's goals with optional equality filters.
    pub async fn list_goals(
        &self,
        owner: &str,
        category: Option<&str>,
        status: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Goal>, u64), AppError> {
        let mut filter = doc! { "user": owner };
        if let Some(category) = category {
            filter.insert("category", category);
        }
        if let Some(status) = status {
            filter.insert("status", status);
        }
        Self::find_page(self.goals()?, filter, page, limit).await
    }

    /// Replace a goal document wholesale. The id is stripped from the
    /// replacement so the stored `_id` is preserved untouched.
    pub async fn replace_goal(&self, id: ObjectId, goal: &Goal) -> Result<(), AppError> {
        let mut replacement = goal.clone();
        replacement.id = None;
        self.goals()?
            .replace_one(doc! { "_id": id }, &replacement)
            .await?;
        Ok(())
    }

    /// Delete a goal. Returns false when no document matched.
    pub async fn delete_goal(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.goals()?.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    // ─── Workout Operations ──────────────────────────────────────

    pub async fn insert_workout(&self, mut workout: Workout) -> Result<Workout, AppError> {
        let result = self.workouts()?.insert_one(&workout).await?;
        workout.id = result.inserted_id.as_object_id();
        Ok(workout)
    }

    pub async fn find_workout(&self, id: ObjectId) -> Result<Option<Workout>, AppError> {
        Ok(self.workouts()?.find_one(doc! { "_id": id }).await?)
    }

    pub async fn list_workouts(
        &self,
        category: Option<&str>,
        difficulty: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Workout>, u64), AppError> {
        let mut filter = doc! {};
        if let Some(category) = category {
            filter.insert("category", category);
        }
        if let Some(difficulty) = difficulty {
            filter.insert("difficulty", difficulty);
        }
        Self::find_page(self.workouts()?, filter, page, limit).await
    }

    pub async fn replace_workout(&self, id: ObjectId, workout: &Workout) -> Result<(), AppError> {
        let mut replacement = workout.clone();
        replacement.id = None;
        self.workouts()?
            .replace_one(doc! { "_id": id }, &replacement)
            .await?;
        Ok(())
    }

    pub async fn delete_workout(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.workouts()?.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    // ─── Meal-Prep Operations ────────────────────────────────────

    pub async fn insert_meal_prep(&self, mut plan: MealPrep) -> Result<MealPrep, AppError> {
        let result = self.meal_preps()?.insert_one(&plan).await?;
        plan.id = result.inserted_id.as_object_id();
        Ok(plan)
    }

    pub async fn find_meal_prep(&self, id: ObjectId) -> Result<Option<MealPrep>, AppError> {
        Ok(self.meal_preps()?.find_one(doc! { "_id": id }).await?)
    }

    /// List one user's meal-prep plans, optionally filtered by status.
    pub async fn list_meal_preps(
        &self,
        owner: &str,
        status: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<MealPrep>, u64), AppError> {
        let mut filter = doc! { "userId": owner };
        if let Some(status) = status {
            filter.insert("status", status);
        }
        Self::find_page(self.meal_preps()?, filter, page, limit).await
    }

    pub async fn replace_meal_prep(&self, id: ObjectId, plan: &MealPrep) -> Result<(), AppError> {
        let mut replacement = plan.clone();
        replacement.id = None;
        self.meal_preps()?
            .replace_one(doc! { "_id": id }, &replacement)
            .await?;
        Ok(())
    }

    pub async fn delete_meal_prep(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.meal_preps()?.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    // ─── Post Operations ─────────────────────────────────────────

    pub async fn insert_post(&self, mut post: Post) -> Result<Post, AppError> {
        let result = self.posts()?.insert_one(&post).await?;
        post.id = result.inserted_id.as_object_id();
        Ok(post)
    }

    pub async fn find_post(&self, id: ObjectId) -> Result<Option<Post>, AppError> {
        Ok(self.posts()?.find_one(doc! { "_id": id }).await?)
    }

    pub async fn list_posts(
        &self,
        category: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Post>, u64), AppError> {
        let mut filter = doc! { "isPublished": true };
        if let Some(category) = category {
            filter.insert("category", category);
        }
        Self::find_page(self.posts()?, filter, page, limit).await
    }

    /// Apply a partial update, returning the updated post.
    pub async fn update_post(
        &self,
        id: ObjectId,
        set: Document,
    ) -> Result<Option<Post>, AppError> {
        Ok(self
            .posts()?
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete_post(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.posts()?.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    // ─── Comment Operations ──────────────────────────────────────

    pub async fn insert_comment(&self, mut comment: Comment) -> Result<Comment, AppError> {
        let result = self.comments()?.insert_one(&comment).await?;
        comment.id = result.inserted_id.as_object_id();
        Ok(comment)
    }

    pub async fn list_comments(
        &self,
        post: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Comment>, u64), AppError> {
        Self::find_page(self.comments()?, doc! { "post": post }, page, limit).await
    }

    /// Remove every comment attached to a post. Best-effort cleanup after
    /// the post itself is deleted; not transactional.
    pub async fn delete_comments_for_post(&self, post: &str) -> Result<u64, AppError> {
        let result = self.comments()?.delete_many(doc! { "post": post }).await?;
        Ok(result.deleted_count)
    }

    // ─── Community Operations ────────────────────────────────────

    pub async fn insert_community(&self, mut community: Community) -> Result<Community, AppError> {
        let result = self.communities()?.insert_one(&community).await?;
        community.id = result.inserted_id.as_object_id();
        Ok(community)
    }

    pub async fn find_community(&self, id: ObjectId) -> Result<Option<Community>, AppError> {
        Ok(self.communities()?.find_one(doc! { "_id": id }).await?)
    }

    /// Exact-name lookup used for the uniqueness check at creation.
    pub async fn find_community_by_name(&self, name: &str) -> Result<Option<Community>, AppError> {
        Ok(self.communities()?.find_one(doc! { "name": name }).await?)
    }

    /// List communities with an optional category filter and a
    /// case-insensitive substring search over name and description.
    pub async fn list_communities(
        &self,
        category: Option<&str>,
        query: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Community>, u64), AppError> {
        let mut filter = doc! {};
        if let Some(category) = category {
            filter.insert("category", category);
        }
        if let Some(query) = query {
            filter.insert(
                "$or",
                vec![
                    doc! { "name": { "$regex": query, "$options": "i" } },
                    doc! { "description": { "$regex": query, "$options": "i" } },
                ],
            );
        }
        Self::find_page(self.communities()?, filter, page, limit).await
    }

    /// Apply a partial update, returning the updated community.
    pub async fn update_community(
        &self,
        id: ObjectId,
        set: Document,
    ) -> Result<Option<Community>, AppError> {
        Ok(self
            .communities()?
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete_community(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.communities()?.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    /// Add a user to the membership list (idempotent).
    pub async fn add_member(&self, id: ObjectId, user: &str) -> Result<bool, AppError> {
        let result = self
            .communities()?
            .update_one(
                doc! { "_id": id },
                doc! { "$addToSet": { "members": user } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    /// Remove a user from the membership list (idempotent).
    pub async fn remove_member(&self, id: ObjectId, user: &str) -> Result<bool, AppError> {
        let result = self
            .communities()?
            .update_one(doc! { "_id": id }, doc! { "$pull": { "members": user } })
            .await?;
        Ok(result.matched_count > 0)
    }
}
