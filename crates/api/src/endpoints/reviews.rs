//! Review endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use reelboard_common::AppResult;
use reelboard_core::{CreateReviewInput, ReviewView, UpdateReviewInput};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, OkResponse},
};

/// Create a review. One per user per post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReviewInput>,
) -> AppResult<ApiResponse<ReviewView>> {
    let review = state.review_service.create(&user, input).await?;

    Ok(ApiResponse::ok(review))
}

/// Update a review.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateReviewInput>,
) -> AppResult<ApiResponse<ReviewView>> {
    let review = state.review_service.update(&user, &id, input).await?;

    Ok(ApiResponse::ok(review))
}

/// Delete a review.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OkResponse>> {
    state.review_service.delete(&user, &id).await?;

    Ok(ApiResponse::ok(OkResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", axum::routing::put(update).patch(update).delete(delete))
}
