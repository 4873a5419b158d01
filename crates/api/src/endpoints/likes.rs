//! Likes listing endpoint.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use reelboard_common::{AppError, AppResult};
use reelboard_core::PostSummary;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// List likes request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLikesQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    20
}

/// A like together with its post.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedPostResponse {
    pub id: String,
    pub created_at: String,
    pub post: PostSummary,
}

/// List the caller's liked posts, newest first.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListLikesQuery>,
) -> AppResult<ApiResponse<Vec<LikedPostResponse>>> {
    let limit = query.limit.min(100);
    let likes = state
        .like_service
        .list(&user, limit, query.until_id.as_deref())
        .await?;

    let mut results = Vec::with_capacity(likes.len());
    for like in likes {
        match state.post_service.summary(Some(&user), &like.post_id).await {
            Ok(post) => results.push(LikedPostResponse {
                id: like.id,
                created_at: like.created_at.to_rfc3339(),
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
