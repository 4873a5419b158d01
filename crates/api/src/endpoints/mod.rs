//! API endpoints.

mod auth;
mod categories;
mod favorites;
mod likes;
mod posts;
mod reviews;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/posts", posts::router())
        .nest("/reviews", reviews::router())
        .nest("/categories", categories::router())
        .nest("/favorites", favorites::router())
        .nest("/likes", likes::router())
}
