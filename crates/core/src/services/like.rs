//! Like service.

use reelboard_common::{AppResult, IdGenerator};
use reelboard_db::{
    entities::{like, user},
    repositories::{LikeRepository, PostRepository},
};
use sea_orm::Set;

use crate::ToggleOutcome;

/// Like service.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(like_repo: LikeRepository, post_repo: PostRepository) -> Self {
        Self {
            like_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like a post.
    pub async fn like(&self, actor: &user::Model, post_id: &str) -> AppResult<ToggleOutcome> {
        self.post_repo.get_by_id(post_id).await?;

        if self.like_repo.is_liked(&actor.id, post_id).await? {
            return Ok(ToggleOutcome::noop("Post is already liked"));
        }

        let model = like::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post_id.to_string()),
            user_id: Set(actor.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.like_repo.create(model).await?;

        tracing::info!(post_id = post_id, user_id = %actor.id, "Post liked");

        Ok(ToggleOutcome::changed("Post liked"))
    }

    /// Remove a like from a post.
    pub async fn unlike(&self, actor: &user::Model, post_id: &str) -> AppResult<ToggleOutcome> {
        self.post_repo.get_by_id(post_id).await?;

        if !self.like_repo.is_liked(&actor.id, post_id).await? {
            return Ok(ToggleOutcome::noop("Post is not liked"));
        }

        self.like_repo
            .delete_by_user_and_post(&actor.id, post_id)
            .await?;

        tracing::info!(post_id = post_id, user_id = %actor.id, "Post unliked");

        Ok(ToggleOutcome::changed("Like removed"))
    }

    /// The user's likes, newest first.
    pub async fn list(
        &self,
        actor: &user::Model,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<like::Model>> {
        self.like_repo.find_by_user(&actor.id, limit, until_id).await
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

    fn test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: None,
            password_hash: "x".to_string(),
            token: None,
            is_active: true,
            is_admin: false,
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

    fn test_like(id: &str, user_id: &str, post_id: &str) -> like::Model {
        like::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_like_twice_is_noop() {
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_like("l1", "u1", "p1")]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_post("p1")]])
                .into_connection(),
        );

        let service = LikeService::new(LikeRepository::new(like_db), PostRepository::new(post_db));

        let outcome = service.like(&test_user("u1"), "p1").await.unwrap();
        assert!(!outcome.changed);
    }

    #[tokio::test]
    async fn test_unlike_absent_is_noop() {
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<like::Model>::new()])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_post("p1")]])
                .into_connection(),
        );

        let service = LikeService::new(LikeRepository::new(like_db), PostRepository::new(post_db));

        let outcome = service.unlike(&test_user("u1"), "p1").await.unwrap();
        assert!(!outcome.changed);
    }
}
