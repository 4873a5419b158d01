//! Category service.

use reelboard_common::{AppError, AppResult};
use reelboard_db::{entities::category, repositories::CategoryRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a category.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 64))]
    pub slug: String,

    #[validate(length(min = 1, max = 256))]
    pub name: String,
}

/// Input for updating a category.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
}

/// Category service. Write access is admin-gated at the API layer.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(category_repo: CategoryRepository) -> Self {
        Self { category_repo }
    }

    /// All categories, ordered by slug.
    pub async fn list(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.find_all().await
    }

    /// Get a category by slug.
    pub async fn get(&self, slug: &str) -> AppResult<category::Model> {
        self.category_repo.get_by_slug(slug).await
    }

    /// Create a category.
    pub async fn create(&self, input: CreateCategoryInput) -> AppResult<category::Model> {
        input.validate()?;

        if self.category_repo.find_by_slug(&input.slug).await?.is_some() {
            return Err(AppError::BadRequest("Category already exists".to_string()));
        }

        let model = category::ActiveModel {
            slug: Set(input.slug),
            name: Set(input.name),
        };

        let category = self.category_repo.create(model).await?;

        tracing::info!(slug = %category.slug, "Category created");

        Ok(category)
    }

    /// Rename a category.
    pub async fn update(&self, slug: &str, input: UpdateCategoryInput) -> AppResult<category::Model> {
        input.validate()?;

        let category = self.category_repo.get_by_slug(slug).await?;

        let mut active: category::ActiveModel = category.into();
        active.name = Set(input.name);

        let category = self.category_repo.update(active).await?;

        tracing::info!(slug = %category.slug, "Category updated");

        Ok(category)
    }

    /// Delete a category. Posts under it go with it via cascade.
    pub async fn delete(&self, slug: &str) -> AppResult<()> {
        let category = self.category_repo.get_by_slug(slug).await?;

        self.category_repo.delete(category).await?;

        tracing::info!(slug = slug, "Category deleted");

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_category(slug: &str, name: &str) -> category::Model {
        category::Model {
            slug: slug.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_duplicate_slug() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_category("drama", "Drama")]])
                .into_connection(),
        );
        let service = CategoryService::new(CategoryRepository::new(db));

        let result = service
            .create(CreateCategoryInput {
                slug: "drama".to_string(),
                name: "Drama".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_missing_category() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );
        let service = CategoryService::new(CategoryRepository::new(db));

        let result = service.get("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    test_category("comedy", "Comedy"),
                    test_category("drama", "Drama"),
                ]])
                .into_connection(),
        );
        let service = CategoryService::new(CategoryRepository::new(db));

        let result = service.list().await.unwrap();
        assert_eq!(result.len(), 2);
    }
}
