//! Redis-backed new-post notification implementation.
//!
//! Queues jobs for the apalis notify worker to process.

use async_trait::async_trait;
use reelboard_common::AppResult;
use reelboard_core::NewPostNotify;

use crate::jobs::NotifyNewPostJob;

/// Redis-backed notification service.
///
/// Pushes notification jobs to Redis for processing by the apalis
/// notify worker.
#[derive(Clone)]
pub struct RedisNotifyService {
    storage: apalis_redis::RedisStorage<NotifyNewPostJob>,
}

impl RedisNotifyService {
    /// Create a new Redis notification service.
    #[must_use]
    pub const fn new(storage: apalis_redis::RedisStorage<NotifyNewPostJob>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl NewPostNotify for RedisNotifyService {
    async fn queue_new_post(&self, post_id: &str, author_id: &str) -> AppResult<()> {
        use apalis::prelude::*;

        tracing::info!(post_id = %post_id, "Queueing new post notification");

        let job = NotifyNewPostJob::new(post_id.to_string(), author_id.to_string());

        self.storage
            .clone()
            .push(job)
            .await
            .map_err(|e| reelboard_common::AppError::Internal(format!("Failed to queue job: {e}")))?;

        Ok(())
    }
}
