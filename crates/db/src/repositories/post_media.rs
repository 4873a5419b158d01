//! Post media repositories.
//!
//! Media rows are written inside the post repository's transactions;
//! these repositories only read them back. Ordering by ID yields
//! creation order, so `first_by_post` is the cover media.

use std::sync::Arc;

use crate::entities::{PostImage, PostVideo, post_image, post_video};
use reelboard_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Post image repository for database operations.
#[derive(Clone)]
pub struct PostImageRepository {
    db: Arc<DatabaseConnection>,
}

impl PostImageRepository {
    /// Create a new post image repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Images of a post in creation order.
    pub async fn find_by_post(&self, post_id: &str) -> AppResult<Vec<post_image::Model>> {
        PostImage::find()
            .filter(post_image::Column::PostId.eq(post_id))
            .order_by_asc(post_image::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Post video repository for database operations.
#[derive(Clone)]
pub struct PostVideoRepository {
    db: Arc<DatabaseConnection>,
}

impl PostVideoRepository {
    /// Create a new post video repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Videos of a post in creation order.
    pub async fn find_by_post(&self, post_id: &str) -> AppResult<Vec<post_video::Model>> {
        PostVideo::find()
            .filter(post_video::Column::PostId.eq(post_id))
            .order_by_asc(post_video::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
