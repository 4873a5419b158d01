//! New-post notification fan-out.
//!
//! Provides an abstraction for queueing the bulk email that goes out
//! after a post is published. The actual implementation is provided by
//! the queue crate.

use async_trait::async_trait;
use reelboard_common::AppResult;
use std::sync::Arc;

/// Trait for queueing new-post notifications.
///
/// This allows the core services to enqueue the fan-out job without
/// directly depending on the queue implementation.
#[async_trait]
pub trait NewPostNotify: Send + Sync {
    /// Queue a notification job for a freshly created post.
    ///
    /// # Arguments
    /// * `post_id` - The ID of the new post
    /// * `author_id` - The ID of the post's author (excluded from fan-out)
    async fn queue_new_post(&self, post_id: &str, author_id: &str) -> AppResult<()>;
}

/// A no-op implementation for testing or when the queue is disabled.
#[derive(Clone, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl NewPostNotify for NoOpNotifier {
    async fn queue_new_post(&self, _post_id: &str, _author_id: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed `NewPostNotify` trait object.
pub type NotifyService = Arc<dyn NewPostNotify>;
