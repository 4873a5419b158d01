//! Favorites listing endpoint.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use reelboard_common::{AppError, AppResult};
use reelboard_core::PostSummary;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// List favorites request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFavoritesQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    20
}

/// A favorite together with its post.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritedPostResponse {
    pub id: String,
    pub created_at: String,
    pub post: PostSummary,
}

/// List the caller's favorited posts, newest first.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListFavoritesQuery>,
) -> AppResult<ApiResponse<Vec<FavoritedPostResponse>>> {
    let limit = query.limit.min(100);
    let favorites = state
        .favorite_service
        .list(&user, limit, query.until_id.as_deref())
        .await?;

    let mut results = Vec::with_capacity(favorites.len());
    for favorite in favorites {
        match state.post_service.summary(Some(&user), &favorite.post_id).await {
            Ok(post) => results.push(FavoritedPostResponse {
                id: favorite.id,
                created_at: favorite.created_at.to_rfc3339(),
                post,
            }),
            // A row whose post is gone is skipped; anything else is a
            // real store failure and must surface.
            Err(AppError::PostNotFound(_) | AppError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(ApiResponse::ok(results))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list))
}
