//! Account service: registration, activation, login, password reset.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use reelboard_common::{AppError, AppResult, IdGenerator};
use reelboard_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::EmailService;

/// Input for registering a new account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(max = 256))]
    pub name: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub password_confirmation: String,
}

/// Input for activating an account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivateInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub code: String,
}

/// Input for logging in.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Input for requesting a password reset code.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequestResetInput {
    #[validate(email)]
    pub email: String,
}

/// Input for completing a password reset.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResetInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub code: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub password_confirmation: String,
}

/// Account service for registration and authentication flows.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    email_service: EmailService,
    id_gen: IdGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, email_service: EmailService) -> Self {
        Self {
            user_repo,
            email_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new, inactive account and email its activation code.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        input.validate()?;

        if input.password != input.password_confirmation {
            return Err(AppError::PasswordMismatch);
        }

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_password(&input.password)?;
        let code = self.id_gen.generate_activation_code();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(input.email.clone()),
            name: Set(input.name),
            password_hash: Set(password_hash),
            token: Set(Some(self.id_gen.generate_token())),
            is_active: Set(false),
            is_admin: Set(false),
            activation_code: Set(code.clone()),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;

        // The account exists either way; a failed email must not roll
        // back registration.
        if let Err(e) = self
            .email_service
            .send_activation_code(&input.email, &code)
            .await
        {
            tracing::warn!(email = %input.email, error = %e, "Failed to send activation email");
        }

        tracing::info!(user_id = %user.id, "Account registered");

        Ok(user)
    }

    /// Activate an account with the emailed code.
    ///
    /// Performs three separate lookups (email, code, pair). Each miss
    /// independently fails the operation.
    pub async fn activate(&self, input: ActivateInput) -> AppResult<user::Model> {
        input.validate()?;

        self.user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        self.user_repo
            .find_by_activation_code(&input.code)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        let user = self
            .user_repo
            .find_by_email_and_code(&input.email, &input.code)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        let mut active: user::ActiveModel = user.into();
        active.is_active = Set(true);
        active.activation_code = Set(String::new());
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let user = self.user_repo.update(active).await?;

        tracing::info!(user_id = %user.id, "Account activated");

        Ok(user)
    }

    /// Authenticate by email and password, issuing a fresh token.
    pub async fn login(&self, input: LoginInput) -> AppResult<(user::Model, String)> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        // Unactivated accounts cannot log in.
        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(token.clone()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let user = self.user_repo.update(active).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok((user, token))
    }

    /// Regenerate the activation code and email it for a password reset.
    pub async fn request_reset(&self, input: RequestResetInput) -> AppResult<()> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        let code = self.id_gen.generate_activation_code();

        let mut active: user::ActiveModel = user.into();
        active.activation_code = Set(code.clone());
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let user = self.user_repo.update(active).await?;

        if let Err(e) = self
            .email_service
            .send_password_reset(&user.email, &code)
            .await
        {
            tracing::warn!(email = %user.email, error = %e, "Failed to send reset email");
        }

        tracing::info!(user_id = %user.id, "Password reset requested");

        Ok(())
    }

    /// Complete a password reset with the emailed code.
    ///
    /// The code is only checked for existence, not against the email.
    /// The new password lands on the account matching the email.
    pub async fn complete_reset(&self, input: CompleteResetInput) -> AppResult<()> {
        input.validate()?;

        if input.password != input.password_confirmation {
            return Err(AppError::PasswordMismatch);
        }

        self.user_repo
            .find_by_activation_code(&input.code)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        let user = self
            .user_repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        let password_hash = hash_password(&input.password)?;

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.activation_code = Set(String::new());
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let user = self.user_repo.update(active).await?;

        tracing::info!(user_id = %user.id, "Password reset completed");

        Ok(())
    }

    /// Authenticate a user by bearer token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> AccountService {
        let user_repo = UserRepository::new(Arc::new(db));
        let email_service = EmailService::new("Reelboard", None).unwrap();
        AccountService::new(user_repo, email_service)
    }

    fn create_test_user(id: &str, email: &str, code: &str, is_active: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: email.to_string(),
            name: Some("Tester".to_string()),
            password_hash: hash_password("correcthorse").unwrap(),
            token: None,
            is_active,
            is_admin: false,
            activation_code: code.to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .register(RegisterInput {
                email: "a@example.com".to_string(),
                name: None,
                password: "password123".to_string(),
                password_confirmation: "password456".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let existing = create_test_user("u1", "a@example.com", "", true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();
        let service = service_with(db);

        let result = service
            .register(RegisterInput {
                email: "a@example.com".to_string(),
                name: None,
                password: "password123".to_string(),
                password_confirmation: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_activate_unknown_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service
            .activate(ActivateInput {
                email: "missing@example.com".to_string(),
                code: "abcd1234".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_activate_unknown_code() {
        let existing = create_test_user("u1", "a@example.com", "realcode", false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service
            .activate(ActivateInput {
                email: "a@example.com".to_string(),
                code: "wrongcod".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service
            .login(LoginInput {
                email: "missing@example.com".to_string(),
                password: "whatever1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let existing = create_test_user("u1", "a@example.com", "", true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();
        let service = service_with(db);

        let result = service
            .login(LoginInput {
                email: "a@example.com".to_string(),
                password: "wrongpassword".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_inactive_account() {
        let existing = create_test_user("u1", "a@example.com", "abcd1234", false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();
        let service = service_with(db);

        let result = service
            .login(LoginInput {
                email: "a@example.com".to_string(),
                password: "correcthorse".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_complete_reset_unknown_code() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service
            .complete_reset(CompleteResetInput {
                email: "a@example.com".to_string(),
                code: "stalecod".to_string(),
                password: "newpassword1".to_string(),
                password_confirmation: "newpassword1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_complete_reset_password_mismatch() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .complete_reset(CompleteResetInput {
                email: "a@example.com".to_string(),
                code: "abcd1234".to_string(),
                password: "newpassword1".to_string(),
                password_confirmation: "different99".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_miss() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let service = service_with(db);

        let result = service.authenticate_by_token("nope").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
