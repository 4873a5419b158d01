//! Post service.

use reelboard_common::{AppError, AppResult, IdGenerator};
use reelboard_db::{
    entities::{post, post_image, post_video, user},
    repositories::{
        CategoryRepository, FavoriteRepository, LikeRepository, PostImageRepository,
        PostRepository, PostVideoRepository, ReviewRepository, UserRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::{NotifyService, PostDetail, PostSummary, ViewerFlags};

/// Default page size for post listings.
const DEFAULT_LIMIT: u64 = 20;

/// Maximum page size for post listings.
const MAX_LIMIT: u64 = 100;

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 512))]
    pub title: String,

    #[validate(length(min = 1))]
    pub text: String,

    #[validate(length(min = 1, max = 64))]
    pub category_slug: String,

    /// Image URLs, attached in the given order. The first becomes the cover.
    #[serde(default)]
    #[validate(length(max = 16))]
    pub image_urls: Vec<String>,

    /// Video URLs, attached in the given order. The first becomes the cover.
    #[serde(default)]
    #[validate(length(max = 4))]
    pub video_urls: Vec<String>,
}

/// Input for updating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 512))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub text: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub category_slug: Option<String>,

    /// Additional image URLs to append.
    #[serde(default)]
    #[validate(length(max = 16))]
    pub image_urls: Vec<String>,

    /// Additional video URLs to append.
    #[serde(default)]
    #[validate(length(max = 4))]
    pub video_urls: Vec<String>,
}

/// Query parameters for listing posts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostQuery {
    /// Substring search over title and text.
    pub search: Option<String>,
    /// Restrict to a category.
    pub category: Option<String>,
    /// Page size.
    pub limit: Option<u64>,
    /// Return posts older than this ID.
    pub until_id: Option<String>,
}

/// Post service for publishing and read-model composition.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    image_repo: PostImageRepository,
    video_repo: PostVideoRepository,
    review_repo: ReviewRepository,
    favorite_repo: FavoriteRepository,
    like_repo: LikeRepository,
    category_repo: CategoryRepository,
    user_repo: UserRepository,
    notify: NotifyService,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        image_repo: PostImageRepository,
        video_repo: PostVideoRepository,
        review_repo: ReviewRepository,
        favorite_repo: FavoriteRepository,
        like_repo: LikeRepository,
        category_repo: CategoryRepository,
        user_repo: UserRepository,
        notify: NotifyService,
    ) -> Self {
        Self {
            post_repo,
            image_repo,
            video_repo,
            review_repo,
            favorite_repo,
            like_repo,
            category_repo,
            user_repo,
            notify,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a post with its media in one transaction, then queue the
    /// new-post notification.
    pub async fn create(&self, author: &user::Model, input: CreatePostInput) -> AppResult<PostDetail> {
        input.validate()?;

        self.category_repo.get_by_slug(&input.category_slug).await?;

        let post_id = self.id_gen.generate();

        let post_model = post::ActiveModel {
            id: Set(post_id.clone()),
            user_id: Set(author.id.clone()),
            category_slug: Set(input.category_slug),
            title: Set(input.title),
            text: Set(input.text),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        // IDs are generated in input order, so the first URL gets the
        // lowest ID and stays the cover.
        let images = self.media_models(&post_id, &input.image_urls, image_model);
        let videos = self.media_models(&post_id, &input.video_urls, video_model);

        let post = self
            .post_repo
            .create_with_media(post_model, images, videos)
            .await?;

        tracing::info!(post_id = %post.id, user_id = %author.id, "Post created");

        // Fire and forget: a queue failure must not fail the response.
        if let Err(e) = self.notify.queue_new_post(&post.id, &author.id).await {
            tracing::warn!(post_id = %post.id, error = %e, "Failed to queue post notification");
        }

        self.compose_detail(Some(author), post).await
    }

    /// List posts, newest first.
    pub async fn list(
        &self,
        viewer: Option<&user::Model>,
        query: PostQuery,
    ) -> AppResult<Vec<PostSummary>> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

        let posts = self
            .post_repo
            .find(
                query.search.as_deref(),
                query.category.as_deref(),
                limit,
                query.until_id.as_deref(),
            )
            .await?;

        let mut summaries = Vec::with_capacity(posts.len());
        for post in posts {
            summaries.push(self.compose_summary(viewer, post).await?);
        }

        Ok(summaries)
    }

    /// Get a single post as a detail view.
    pub async fn get(&self, viewer: Option<&user::Model>, id: &str) -> AppResult<PostDetail> {
        let post = self.post_repo.get_by_id(id).await?;
        self.compose_detail(viewer, post).await
    }

    /// Get a single post as a summary view.
    pub async fn summary(&self, viewer: Option<&user::Model>, id: &str) -> AppResult<PostSummary> {
        let post = self.post_repo.get_by_id(id).await?;
        self.compose_summary(viewer, post).await
    }

    /// Update a post. Only the author or an admin may update.
    pub async fn update(
        &self,
        actor: &user::Model,
        id: &str,
        input: UpdatePostInput,
    ) -> AppResult<PostDetail> {
        input.validate()?;

        let post = self.post_repo.get_by_id(id).await?;

        if post.user_id != actor.id && !actor.is_admin {
            return Err(AppError::Forbidden(
                "You can only edit your own posts".to_string(),
            ));
        }

        if let Some(slug) = &input.category_slug {
            self.category_repo.get_by_slug(slug).await?;
        }

        let mut active: post::ActiveModel = post.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(text) = input.text {
            active.text = Set(text);
        }
        if let Some(slug) = input.category_slug {
            active.category_slug = Set(slug);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let post = self.post_repo.update(active).await?;

        let images = self.media_models(&post.id, &input.image_urls, image_model);
        let videos = self.media_models(&post.id, &input.video_urls, video_model);
        self.post_repo.append_media(images, videos).await?;

        tracing::info!(post_id = %post.id, user_id = %actor.id, "Post updated");

        self.compose_detail(Some(actor), post).await
    }

    /// Delete a post. Only the author or an admin may delete.
    pub async fn delete(&self, actor: &user::Model, id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(id).await?;

        if post.user_id != actor.id && !actor.is_admin {
            return Err(AppError::Forbidden(
                "You can only delete your own posts".to_string(),
            ));
        }

        let post_id = post.id.clone();
        self.post_repo.delete(post).await?;

        tracing::info!(post_id = %post_id, user_id = %actor.id, "Post deleted");

        Ok(())
    }

    async fn compose_summary(
        &self,
        viewer: Option<&user::Model>,
        post: post::Model,
    ) -> AppResult<PostSummary> {
        let author = self.user_repo.get_by_id(&post.user_id).await?;
        let images = self.image_repo.find_by_post(&post.id).await?;
        let videos = self.video_repo.find_by_post(&post.id).await?;
        let ratings: Vec<i16> = self
            .review_repo
            .find_by_post(&post.id)
            .await?
            .iter()
            .map(|r| r.rating)
            .collect();
        let likes_count = self.like_repo.count_by_post(&post.id).await?;
        let flags = self.viewer_flags(viewer, &post.id).await?;

        Ok(PostSummary::compose(
            post,
            author,
            &images,
            &videos,
            &ratings,
            likes_count,
            flags,
        ))
    }

    async fn compose_detail(
        &self,
        viewer: Option<&user::Model>,
        post: post::Model,
    ) -> AppResult<PostDetail> {
        let author = self.user_repo.get_by_id(&post.user_id).await?;
        let images = self.image_repo.find_by_post(&post.id).await?;
        let videos = self.video_repo.find_by_post(&post.id).await?;
        let reviews = self.review_repo.find_by_post(&post.id).await?;
        let likes_count = self.like_repo.count_by_post(&post.id).await?;
        let flags = self.viewer_flags(viewer, &post.id).await?;

        Ok(PostDetail::compose(
            post,
            author,
            images,
            videos,
            reviews,
            likes_count,
            flags,
        ))
    }

    async fn viewer_flags(
        &self,
        viewer: Option<&user::Model>,
        post_id: &str,
    ) -> AppResult<Option<ViewerFlags>> {
        let Some(viewer) = viewer else {
            return Ok(None);
        };

        Ok(Some(ViewerFlags {
            is_favorited: self.favorite_repo.is_favorited(&viewer.id, post_id).await?,
            is_liked: self.like_repo.is_liked(&viewer.id, post_id).await?,
        }))
    }

    fn media_models<M>(&self, post_id: &str, urls: &[String], build: fn(String, &str, &str) -> M) -> Vec<M> {
        urls.iter()
            .map(|url| build(self.id_gen.generate(), post_id, url))
            .collect()
    }
}

fn image_model(id: String, post_id: &str, url: &str) -> post_image::ActiveModel {
    post_image::ActiveModel {
        id: Set(id),
        post_id: Set(post_id.to_string()),
        url: Set(url.to_string()),
    }
}

fn video_model(id: String, post_id: &str, url: &str) -> post_video::ActiveModel {
    post_video::ActiveModel {
        id: Set(id),
        post_id: Set(post_id.to_string()),
        url: Set(url.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::NoOpNotifier;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

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

    fn test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            category_slug: "drama".to_string(),
            title: "Title".to_string(),
            text: "Text".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with_post_db(post_db: Arc<sea_orm::DatabaseConnection>) -> PostService {
        PostService::new(
            PostRepository::new(post_db),
            PostImageRepository::new(empty_db()),
            PostVideoRepository::new(empty_db()),
            ReviewRepository::new(empty_db()),
            FavoriteRepository::new(empty_db()),
            LikeRepository::new(empty_db()),
            CategoryRepository::new(empty_db()),
            UserRepository::new(empty_db()),
            Arc::new(NoOpNotifier),
        )
    }

    #[tokio::test]
    async fn test_delete_requires_author_or_admin() {
        let post = test_post("p1", "owner");
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );
        let service = service_with_post_db(post_db);

        let stranger = test_user("stranger", false);
        let result = service.delete(&stranger, "p1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_non_author() {
        let post = test_post("p1", "owner");
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );
        let service = service_with_post_db(post_db);

        let stranger = test_user("stranger", false);
        let result = service
            .update(
                &stranger,
                "p1",
                UpdatePostInput {
                    title: Some("New".to_string()),
                    text: None,
                    category_slug: None,
                    image_urls: vec![],
                    video_urls: vec![],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );
        let service = service_with_post_db(post_db);

        let result = service.get(None, "missing").await;
        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let service = service_with_post_db(empty_db());
        let author = test_user("u1", false);

        let result = service
            .create(
                &author,
                CreatePostInput {
                    title: String::new(),
                    text: "Body".to_string(),
                    category_slug: "drama".to_string(),
                    image_urls: vec![],
                    video_urls: vec![],
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
