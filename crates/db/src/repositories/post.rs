//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, PostImage, PostVideo, post, post_image, post_video};
use reelboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// List posts, newest first, with optional search and category filter.
    pub async fn find(
        &self,
        search: Option<&str>,
        category_slug: Option<&str>,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<post::Model>> {
        let mut query = Post::find().order_by_desc(post::Column::Id);

        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(post::Column::Title.contains(term))
                    .add(post::Column::Text.contains(term)),
            );
        }

        if let Some(slug) = category_slug {
            query = query.filter(post::Column::CategorySlug.eq(slug));
        }

        if let Some(id) = until_id {
            query = query.filter(post::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a post together with its media rows in one transaction.
    ///
    /// Either the post and every image/video row land, or none do.
    pub async fn create_with_media(
        &self,
        post_model: post::ActiveModel,
        images: Vec<post_image::ActiveModel>,
        videos: Vec<post_video::ActiveModel>,
    ) -> AppResult<post::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let post = post_model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !images.is_empty() {
            PostImage::insert_many(images)
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        if !videos.is_empty() {
            PostVideo::insert_many(videos)
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(post)
    }

    /// Attach additional media rows to an existing post.
    pub async fn append_media(
        &self,
        images: Vec<post_image::ActiveModel>,
        videos: Vec<post_video::ActiveModel>,
    ) -> AppResult<()> {
        if images.is_empty() && videos.is_empty() {
            return Ok(());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !images.is_empty() {
            PostImage::insert_many(images)
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        if !videos.is_empty() {
            PostVideo::insert_many(videos)
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post. Media, reviews, favorites and likes go with it
    /// via the store's cascade rules.
    pub async fn delete(&self, model: post::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
