//! Favorite service.

use reelboard_common::{AppResult, IdGenerator};
use reelboard_db::{
    entities::{favorite, user},
    repositories::{FavoriteRepository, PostRepository},
};
use sea_orm::Set;
use serde::Serialize;

/// Result of an add/remove toggle.
///
/// Adding something already present, or removing something absent, is
/// a no-op communicated through the message, never an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    /// Whether the store actually changed.
    pub changed: bool,
    /// Human-readable description of what happened.
    pub message: String,
}

impl ToggleOutcome {
    pub(crate) fn changed(message: &str) -> Self {
        Self {
            changed: true,
            message: message.to_string(),
        }
    }

    pub(crate) fn noop(message: &str) -> Self {
        Self {
            changed: false,
            message: message.to_string(),
        }
    }
}

/// Favorite service.
#[derive(Clone)]
pub struct FavoriteService {
    favorite_repo: FavoriteRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl FavoriteService {
    /// Create a new favorite service.
    #[must_use]
    pub const fn new(favorite_repo: FavoriteRepository, post_repo: PostRepository) -> Self {
        Self {
            favorite_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a post to the user's favorites.
    pub async fn add(&self, actor: &user::Model, post_id: &str) -> AppResult<ToggleOutcome> {
        self.post_repo.get_by_id(post_id).await?;

        if self.favorite_repo.is_favorited(&actor.id, post_id).await? {
            return Ok(ToggleOutcome::noop("Post is already in favorites"));
        }

        let model = favorite::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post_id.to_string()),
            user_id: Set(actor.id.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.favorite_repo.create(model).await?;

        tracing::info!(post_id = post_id, user_id = %actor.id, "Post favorited");

        Ok(ToggleOutcome::changed("Post added to favorites"))
    }

    /// Remove a post from the user's favorites.
    pub async fn remove(&self, actor: &user::Model, post_id: &str) -> AppResult<ToggleOutcome> {
        self.post_repo.get_by_id(post_id).await?;

        if !self.favorite_repo.is_favorited(&actor.id, post_id).await? {
            return Ok(ToggleOutcome::noop("Post is not in favorites"));
        }

        self.favorite_repo
            .delete_by_user_and_post(&actor.id, post_id)
            .await?;

        tracing::info!(post_id = post_id, user_id = %actor.id, "Post unfavorited");

        Ok(ToggleOutcome::changed("Post removed from favorites"))
    }

    /// The user's favorites, newest first.
    pub async fn list(
        &self,
        actor: &user::Model,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<favorite::Model>> {
        self.favorite_repo
            .find_by_user(&actor.id, limit, until_id)
            .await
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

    fn test_favorite(id: &str, user_id: &str, post_id: &str) -> favorite::Model {
        favorite::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_add_already_favorited_is_noop() {
        let favorite_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_favorite("f1", "u1", "p1")]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_post("p1")]])
                .into_connection(),
        );

        let service = FavoriteService::new(
            FavoriteRepository::new(favorite_db),
            PostRepository::new(post_db),
        );

        let outcome = service.add(&test_user("u1"), "p1").await.unwrap();
        assert!(!outcome.changed);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let favorite_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<favorite::Model>::new()])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_post("p1")]])
                .into_connection(),
        );

        let service = FavoriteService::new(
            FavoriteRepository::new(favorite_db),
            PostRepository::new(post_db),
        );

        let outcome = service.remove(&test_user("u1"), "p1").await.unwrap();
        assert!(!outcome.changed);
    }

    #[tokio::test]
    async fn test_add_to_missing_post_fails() {
        let favorite_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let service = FavoriteService::new(
            FavoriteRepository::new(favorite_db),
            PostRepository::new(post_db),
        );

        let result = service.add(&test_user("u1"), "missing").await;
        assert!(result.is_err());
    }
}
