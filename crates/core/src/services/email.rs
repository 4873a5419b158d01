//! Outbound email service.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use reelboard_common::{AppError, AppResult, config::EmailConfig};

/// Email service backed by an SMTP relay.
///
/// When no email configuration is present, the service is disabled and
/// every send becomes a logged no-op. Account registration and password
/// reset still work; the codes just never leave the server.
#[derive(Clone)]
pub struct EmailService {
    mailer: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
    site_name: String,
}

impl EmailService {
    /// Create a new email service.
    pub fn new(site_name: &str, config: Option<&EmailConfig>) -> AppResult<Self> {
        let Some(config) = config else {
            return Ok(Self {
                mailer: None,
                from: None,
                site_name: site_name.to_string(),
            });
        };

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| AppError::Config(format!("Invalid SMTP host: {e}")))?
                .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = config
            .from_address
            .parse::<Mailbox>()
            .map_err(|e| AppError::Config(format!("Invalid from address: {e}")))?;

        Ok(Self {
            mailer: Some(builder.build()),
            from: Some(from),
            site_name: site_name.to_string(),
        })
    }

    /// Check if email sending is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    /// Send the account activation code.
    pub async fn send_activation_code(&self, to: &str, code: &str) -> AppResult<()> {
        let subject = format!("Activate your {} account", self.site_name);
        let body = format!(
            "Welcome to {}!\n\n\
            Your activation code is: {code}\n\n\
            Enter it together with your email address to activate your account.",
            self.site_name
        );
        self.send(to, &subject, &body).await
    }

    /// Send the password reset code.
    pub async fn send_password_reset(&self, to: &str, code: &str) -> AppResult<()> {
        let subject = format!("Reset your {} password", self.site_name);
        let body = format!(
            "You requested a password reset on {}.\n\n\
            Your reset code is: {code}\n\n\
            If you didn't request this, you can ignore this email.",
            self.site_name
        );
        self.send(to, &subject, &body).await
    }

    /// Send a new-post announcement to one recipient.
    pub async fn send_new_post(&self, to: &str, title: &str, author: &str) -> AppResult<()> {
        let subject = format!("New post on {}: {title}", self.site_name);
        let body = format!(
            "{author} just published \"{title}\" on {}.\n\n\
            Log in to read it.",
            self.site_name
        );
        self.send(to, &subject, &body).await
    }

    /// Send a plain text email.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let (Some(mailer), Some(from)) = (&self.mailer, &self.from) else {
            tracing::debug!(to = to, subject = subject, "Email disabled, skipping send");
            return Ok(());
        };

        let to_mailbox = to
            .parse::<Mailbox>()
            .map_err(|e| AppError::BadRequest(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(from.clone())
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to build email: {e}")))?;

        mailer
            .send(message)
            .await
            .map_err(|e| AppError::ExternalService(format!("SMTP send failed: {e}")))?;

        tracing::info!(to = to, subject = subject, "Email sent");

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_config() {
        let service = EmailService::new("Reelboard", None).unwrap();
        assert!(!service.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_send_is_noop() {
        let service = EmailService::new("Reelboard", None).unwrap();
        service
            .send("someone@example.com", "Hi", "Body")
            .await
            .unwrap();
    }

    #[test]
    fn test_invalid_from_address_rejected() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            username: None,
            password: None,
            from_address: "not an address".to_string(),
        };
        let result = EmailService::new("Reelboard", Some(&config));
        assert!(result.is_err());
    }
}
