//! Category endpoints.
//!
//! Reads are public; writes are restricted to admins.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use reelboard_common::{AppError, AppResult};
use reelboard_core::{CreateCategoryInput, UpdateCategoryInput};
use reelboard_db::entities::{category, user};
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, OkResponse},
};

/// Category response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub slug: String,
    pub name: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(category: category::Model) -> Self {
        Self {
            slug: category.slug,
            name: category.name,
        }
    }
}

fn require_admin(user: &user::Model) -> AppResult<()> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only administrators can manage categories".to_string(),
        ))
    }
}

/// List all categories.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let categories = state.category_service.list().await?;

    Ok(ApiResponse::ok(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// Get a single category.
async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let category = state.category_service.get(&slug).await?;

    Ok(ApiResponse::ok(category.into()))
}

/// Create a category (admin only).
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    require_admin(&user)?;

    let category = state.category_service.create(input).await?;

    Ok(ApiResponse::ok(category.into()))
}

/// Rename a category (admin only).
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<UpdateCategoryInput>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    require_admin(&user)?;

    let category = state.category_service.update(&slug, input).await?;

    Ok(ApiResponse::ok(category.into()))
}

/// Delete a category (admin only).
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<OkResponse>> {
    require_admin(&user)?;

    state.category_service.delete(&slug).await?;

    Ok(ApiResponse::ok(OkResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{slug}", get(show).put(update).patch(update).delete(delete))
}
