//! New-post notification worker.

use apalis::prelude::*;
use reelboard_core::EmailService;
use reelboard_db::repositories::{PostRepository, UserRepository};
use tracing::{error, info, warn};

use crate::jobs::NotifyNewPostJob;

/// Context for the notification worker.
#[derive(Clone)]
pub struct NotifyContext {
    pub post_repo: PostRepository,
    pub user_repo: UserRepository,
    pub email_service: EmailService,
}

impl NotifyContext {
    /// Create a new notification context.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        user_repo: UserRepository,
        email_service: EmailService,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            email_service,
        }
    }
}

/// Worker function for new-post notifications.
///
/// A single failed recipient does not fail the job; the send error is
/// logged and delivery continues with the rest of the list.
///
/// # Errors
/// Returns an error if the post or its author cannot be loaded.
pub async fn notify_worker(job: NotifyNewPostJob, ctx: Data<NotifyContext>) -> Result<(), Error> {
    info!(post_id = %job.post_id, "Sending new post notifications");

    match notify_members(&job, &ctx).await {
        Ok(sent) => {
            info!(post_id = %job.post_id, sent = %sent, "New post notifications sent");
            Ok(())
        }
        Err(e) => {
            error!(post_id = %job.post_id, error = %e, "Failed to send new post notifications");
            Err(Error::Failed(e.into()))
        }
    }
}

async fn notify_members(
    job: &NotifyNewPostJob,
    ctx: &NotifyContext,
) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    let post = ctx.post_repo.get_by_id(&job.post_id).await?;
    let author = ctx.user_repo.get_by_id(&job.author_id).await?;
    let author_name = author.name.as_deref().unwrap_or(&author.email);

    let recipients = ctx.user_repo.find_active_except(&job.author_id).await?;

    let mut sent = 0;
    for recipient in recipients {
        match ctx
            .email_service
            .send_new_post(&recipient.email, &post.title, author_name)
            .await
        {
            Ok(()) => sent += 1,
            Err(e) => {
                warn!(
                    recipient = %recipient.email,
                    post_id = %job.post_id,
                    error = %e,
                    "Failed to send new post email"
                );
            }
        }
    }

    Ok(sent)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reelboard_db::entities::{post, user};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: &str, email: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: email.to_string(),
            name: Some("Member".to_string()),
            password_hash: "hash".to_string(),
            token: Some("token".to_string()),
            is_active: true,
            is_admin: false,
            activation_code: String::new(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_post(id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            category_slug: "drama".to_string(),
            title: "Fresh".to_string(),
            text: "Body".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_notify_members_counts_recipients() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_post("p1")]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_user("u1", "author@x.com")]])
                .append_query_results([vec![
                    test_user("u2", "b@x.com"),
                    test_user("u3", "c@x.com"),
                ]])
                .into_connection(),
        );

        let ctx = NotifyContext::new(
            PostRepository::new(post_db),
            UserRepository::new(user_db),
            EmailService::new("Reelboard", None).unwrap(),
        );
        let job = NotifyNewPostJob::new("p1".to_string(), "u1".to_string());

        // Disabled mailer treats every send as delivered.
        let sent = notify_members(&job, &ctx).await.unwrap();
        assert_eq!(sent, 2);
    }

    #[tokio::test]
    async fn test_notify_members_missing_post_fails() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let ctx = NotifyContext::new(
            PostRepository::new(post_db),
            UserRepository::new(user_db),
            EmailService::new("Reelboard", None).unwrap(),
        );
        let job = NotifyNewPostJob::new("missing".to_string(), "u1".to_string());

        assert!(notify_members(&job, &ctx).await.is_err());
    }
}
