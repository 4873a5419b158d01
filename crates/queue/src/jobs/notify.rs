//! New-post notification job.

use serde::{Deserialize, Serialize};

/// Job to email every active member about a freshly published post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyNewPostJob {
    /// The post that was published.
    pub post_id: String,

    /// The author, excluded from the recipient list.
    pub author_id: String,
}

impl NotifyNewPostJob {
    /// Create a new notification job.
    #[must_use]
    pub const fn new(post_id: String, author_id: String) -> Self {
        Self { post_id, author_id }
    }
}
