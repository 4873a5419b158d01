//! Post endpoints, including the per-post favorite and like toggles.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use reelboard_common::AppResult;
use reelboard_core::{
    CreatePostInput, PostDetail, PostQuery, PostSummary, ReviewView, ToggleOutcome,
    UpdatePostInput,
};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, OkResponse},
};

/// List posts, newest first. Supports search and category filtering.
async fn list(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<PostQuery>,
) -> AppResult<ApiResponse<Vec<PostSummary>>> {
    let posts = state.post_service.list(viewer.as_ref(), query).await?;

    Ok(ApiResponse::ok(posts))
}

/// Create a post with optional media attachments.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostDetail>> {
    let post = state.post_service.create(&user, input).await?;

    Ok(ApiResponse::ok(post))
}

/// Get a single post.
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostDetail>> {
    let post = state.post_service.get(viewer.as_ref(), &id).await?;

    Ok(ApiResponse::ok(post))
}

/// Update a post.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePostInput>,
) -> AppResult<ApiResponse<PostDetail>> {
    let post = state.post_service.update(&user, &id, input).await?;

    Ok(ApiResponse::ok(post))
}

/// Delete a post.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OkResponse>> {
    state.post_service.delete(&user, &id).await?;

    Ok(ApiResponse::ok(OkResponse { ok: true }))
}

/// List a post's reviews, newest first.
async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<ReviewView>>> {
    let reviews = state.review_service.list_for_post(&id).await?;

    Ok(ApiResponse::ok(reviews))
}

/// Add the post to the caller's favorites.
async fn add_to_favorites(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ToggleOutcome>> {
    let outcome = state.favorite_service.add(&user, &id).await?;

    Ok(ApiResponse::ok(outcome))
}

/// Remove the post from the caller's favorites.
async fn remove_from_favorites(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ToggleOutcome>> {
    let outcome = state.favorite_service.remove(&user, &id).await?;

    Ok(ApiResponse::ok(outcome))
}

/// Like the post.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ToggleOutcome>> {
    let outcome = state.like_service.like(&user, &id).await?;

    Ok(ApiResponse::ok(outcome))
}

/// Remove the caller's like from the post.
async fn dislike(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ToggleOutcome>> {
    let outcome = state.like_service.unlike(&user, &id).await?;

    Ok(ApiResponse::ok(outcome))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).patch(update).delete(delete))
        .route("/{id}/reviews", get(reviews))
        .route("/{id}/add_to_favorites", post(add_to_favorites))
        .route("/{id}/remove_from_favorites", post(remove_from_favorites))
        .route("/{id}/like", post(like))
        .route("/{id}/dislike", post(dislike))
}
