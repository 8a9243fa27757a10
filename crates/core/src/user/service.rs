//! User service implementation.

use std::sync::Arc;

use chrono::Utc;
use kitty_shared::types::UserId;
use tracing::info;

use super::error::UserError;
use super::policy::{validate_nickname, validate_password};
use super::types::{RegisterUserInput, UpdateUserInput, User};
use crate::auth::{AccountStatus, PasswordEncoder, UserRole};
use crate::repository::RepositoryError;

/// Repository trait for user persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait UserRepository: Send + Sync {
    /// Insert a user without an id, or update an existing one.
    ///
    /// Inserts assign an id; updates bump the version and fail with
    /// `RepositoryError::Conflict` when `user.version` is stale.
    fn save(
        &self,
        user: User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Find a user by exact email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Find a user by ID.
    fn find_by_id(
        &self,
        id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Remove a user. Removing an absent user is a no-op.
    fn delete(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Sends account verification messages.
///
/// Delivery is fire-and-forget: implementations log their own failures.
pub trait EmailVerificationSender: Send + Sync {
    /// Ask the owner of `email` to confirm it.
    fn send_verification(&self, email: &str) -> impl std::future::Future<Output = ()> + Send;
}

/// User service for account management.
pub struct UserService<R: UserRepository, P: PasswordEncoder, M: EmailVerificationSender> {
    repo: Arc<R>,
    encoder: Arc<P>,
    mailer: Arc<M>,
}

impl<R: UserRepository, P: PasswordEncoder, M: EmailVerificationSender> UserService<R, P, M> {
    /// Create a new user service.
    #[must_use]
    pub fn new(repo: Arc<R>, encoder: Arc<P>, mailer: Arc<M>) -> Self {
        Self {
            repo,
            encoder,
            mailer,
        }
    }

    /// Register a new account with role `user`.
    ///
    /// Checks run in order: email uniqueness, password policy, nickname. Nothing is
    /// encoded or sent when any of them fails.
    pub async fn register(&self, input: RegisterUserInput) -> Result<User, UserError> {
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::AlreadyExists(input.email));
        }
        validate_password(&input.password)?;
        validate_nickname(input.nickname.as_deref())?;

        let password_hash = self.encode(&input.password)?;

        let user = User {
            id: None,
            email: input.email,
            nickname: input.nickname,
            password_hash,
            role: UserRole::User,
            is_email_verified: false,
            account_status: AccountStatus::Active,
            created_at: Utc::now(),
            updated_at: None,
            last_login_at: None,
            version: 0,
        };

        let saved = self.repo.save(user).await?;
        info!(user_id = ?saved.id, email = %saved.email, "Registered new user");

        self.mailer.send_verification(&saved.email).await;
        Ok(saved)
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: UserId) -> Result<User, UserError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Get a user by email.
    pub async fn get_by_email(&self, email: &str) -> Result<User, UserError> {
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::EmailNotFound(email.to_string()))
    }

    /// Returns true if an account with this id exists.
    pub async fn exists(&self, id: UserId) -> Result<bool, UserError> {
        Ok(self.repo.find_by_id(id).await?.is_some())
    }

    /// Replace the email, password and nickname of an account.
    ///
    /// A changed email resets the verified flag and triggers a new verification.
    pub async fn update(&self, id: UserId, input: UpdateUserInput) -> Result<User, UserError> {
        let mut user = self.get_by_id(id).await?;

        let email_changed = user.email != input.email;
        if email_changed && self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::AlreadyExists(input.email));
        }
        validate_password(&input.password)?;
        validate_nickname(input.nickname.as_deref())?;

        user.password_hash = self.encode(&input.password)?;
        user.nickname = input.nickname;
        user.updated_at = Some(Utc::now());
        if email_changed {
            user.email = input.email;
            user.is_email_verified = false;
        }

        let saved = self.repo.save(user).await?;
        info!(user_id = %id, email_changed, "Updated user");

        if email_changed {
            self.mailer.send_verification(&saved.email).await;
        }
        Ok(saved)
    }

    /// Remove an account.
    pub async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let user = self.get_by_id(id).await?;
        self.repo.delete(&user).await?;
        info!(user_id = %id, "Deleted user");
        Ok(())
    }

    /// Check credentials and record the login time.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let Some(mut user) = self.repo.find_by_email(email).await? else {
            info!(email = %email, "Login attempt for non-existent user");
            return Err(UserError::InvalidCredentials);
        };

        let matches = self
            .encoder
            .matches(password, &user.password_hash)
            .map_err(|e| UserError::Encoding(e.to_string()))?;
        if !matches {
            info!(user_id = ?user.id, "Failed login attempt - invalid password");
            return Err(UserError::InvalidCredentials);
        }

        if !user.can_log_in() {
            return Err(UserError::AccountDisabled);
        }

        user.last_login_at = Some(Utc::now());
        let saved = self.repo.save(user).await?;
        info!(user_id = ?saved.id, "User logged in");
        Ok(saved)
    }

    fn encode(&self, password: &str) -> Result<String, UserError> {
        self.encoder
            .encode(password)
            .map_err(|e| UserError::Encoding(e.to_string()))
    }
}
