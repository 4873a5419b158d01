//! Review service.

use reelboard_common::{AppError, AppResult, IdGenerator};
use reelboard_db::{
    entities::{review, user},
    repositories::{PostRepository, ReviewRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::ReviewView;

/// Input for creating a review.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewInput {
    #[validate(length(min = 1, max = 32))]
    pub post_id: String,

    #[validate(length(min = 1))]
    pub text: String,

    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
}

/// Input for updating a review.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewInput {
    #[validate(length(min = 1))]
    pub text: Option<String>,

    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i16>,
}

/// Review service.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(review_repo: ReviewRepository, post_repo: PostRepository) -> Self {
        Self {
            review_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a review. One review per user per post.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: CreateReviewInput,
    ) -> AppResult<ReviewView> {
        input.validate()?;

        self.post_repo.get_by_id(&input.post_id).await?;

        if self
            .review_repo
            .exists_by_user_and_post(&actor.id, &input.post_id)
            .await?
        {
            return Err(AppError::DuplicateReview);
        }

        let model = review::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(input.post_id),
            user_id: Set(actor.id.clone()),
            text: Set(input.text),
            rating: Set(input.rating),
            created_at: Set(chrono::Utc::now().into()),
        };

        let review = self.review_repo.create(model).await?;

        tracing::info!(review_id = %review.id, user_id = %actor.id, "Review created");

        Ok(review.into())
    }

    /// Reviews of a post, newest first.
    pub async fn list_for_post(&self, post_id: &str) -> AppResult<Vec<ReviewView>> {
        self.post_repo.get_by_id(post_id).await?;

        Ok(self
            .review_repo
            .find_by_post(post_id)
            .await?
            .into_iter()
            .map(ReviewView::from)
            .collect())
    }

    /// Update a review. Only the author or an admin may update.
    pub async fn update(
        &self,
        actor: &user::Model,
        id: &str,
        input: UpdateReviewInput,
    ) -> AppResult<ReviewView> {
        input.validate()?;

        let review = self.review_repo.get_by_id(id).await?;

        if review.user_id != actor.id && !actor.is_admin {
            return Err(AppError::Forbidden(
                "You can only edit your own reviews".to_string(),
            ));
        }

        let mut active: review::ActiveModel = review.into();

        if let Some(text) = input.text {
            active.text = Set(text);
        }
        if let Some(rating) = input.rating {
            active.rating = Set(rating);
        }

        let review = self.review_repo.update(active).await?;

        tracing::info!(review_id = %review.id, user_id = %actor.id, "Review updated");

        Ok(review.into())
    }

    /// Delete a review. Only the author or an admin may delete.
    pub async fn delete(&self, actor: &user::Model, id: &str) -> AppResult<()> {
        let review = self.review_repo.get_by_id(id).await?;

        if review.user_id != actor.id && !actor.is_admin {
            return Err(AppError::Forbidden(
                "You can only delete your own reviews".to_string(),
            ));
        }

        let review_id = review.id.clone();
        self.review_repo.delete(review).await?;

        tracing::info!(review_id = %review_id, user_id = %actor.id, "Review deleted");

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reelboard_db::entities::post;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: None,
            password_hash: "x".to_string(),
            token: None,
            is_active: true,
            is_admin,
            activation_code: String::new(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_post(id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: "author".to_string(),
            category_slug: "drama".to_string(),
            title: "Title".to_string(),
            text: "Text".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_review(id: &str, user_id: &str, post_id: &str) -> review::Model {
        review::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            text: "Nice".to_string(),
            rating: 4,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_duplicate_review() {
        let review_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_review("r1", "u1", "p1")]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_post("p1")]])
                .into_connection(),
        );

        let service = ReviewService::new(
            ReviewRepository::new(review_db),
            PostRepository::new(post_db),
        );

        let result = service
            .create(
                &test_user("u1", false),
                CreateReviewInput {
                    post_id: "p1".to_string(),
                    text: "Again".to_string(),
                    rating: 5,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::DuplicateReview)));
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_rating() {
        let service = ReviewService::new(
            ReviewRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
            PostRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
        );

        let result = service
            .create(
                &test_user("u1", false),
                CreateReviewInput {
                    post_id: "p1".to_string(),
                    text: "Way too good".to_string(),
                    rating: 6,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_rejects_non_author() {
        let review_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_review("r1", "owner", "p1")]])
                .into_connection(),
        );
        let service = ReviewService::new(
            ReviewRepository::new(review_db),
            PostRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
        );

        let result = service.delete(&test_user("stranger", false), "r1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
