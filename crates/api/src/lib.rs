//! HTTP API layer for reelboard.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: account, post, review, category, favorite, like
//! - **Extractors**: required and optional authentication
//! - **Middleware**: bearer-token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
