//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use reelboard_core::{
    AccountService, CategoryService, FavoriteService, LikeService, PostService, ReviewService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub post_service: PostService,
    pub review_service: ReviewService,
    pub category_service: CategoryService,
    pub favorite_service: FavoriteService,
    pub like_service: LikeService,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to a user and attaches it to the request
/// extensions. Requests without a valid token pass through anonymous;
/// endpoints that require auth reject via the [`crate::extractors::AuthUser`]
/// extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.account_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
