//! Review repository.

use std::sync::Arc;

use crate::entities::{Review, review};
use reelboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a review by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<review::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("review {id}")))
    }

    /// Check whether a user has already reviewed a post.
    ///
    /// A single (user, post) existence check; one row at most thanks to
    /// the unique pair index.
    pub async fn exists_by_user_and_post(&self, user_id: &str, post_id: &str) -> AppResult<bool> {
        Ok(Review::find()
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_some())
    }

    /// Reviews of a post, newest first.
    pub async fn find_by_post(&self, post_id: &str) -> AppResult<Vec<review::Model>> {
        Review::find()
            .filter(review::Column::PostId.eq(post_id))
            .order_by_desc(review::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new review.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a review.
    pub async fn update(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a review.
    pub async fn delete(&self, model: review::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_review(id: &str, user_id: &str, post_id: &str, rating: i16) -> review::Model {
        review::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            text: "Great".to_string(),
            rating,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_exists_by_user_and_post_true() {
        let review = create_test_review("r1", "u1", "p1", 5);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[review]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        assert!(repo.exists_by_user_and_post("u1", "p1").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_by_user_and_post_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<review::Model>::new()])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        assert!(!repo.exists_by_user_and_post("u1", "p1").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_post() {
        let r1 = create_test_review("r2", "u1", "p1", 4);
        let r2 = create_test_review("r1", "u2", "p1", 5);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.find_by_post("p1").await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
