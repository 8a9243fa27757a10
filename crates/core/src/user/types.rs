//! User types and data structures.

use chrono::{DateTime, Utc};
use kitty_shared::types::UserId;
use serde::{Deserialize, Serialize};

use crate::auth::{AccountStatus, UserRole};

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account ID, absent until first saved.
    pub id: Option<UserId>,
    /// Unique login email, compared case-sensitively.
    pub email: String,
    /// Optional display name.
    pub nickname: Option<String>,
    /// Encoded password.
    pub password_hash: String,
    /// Account role.
    pub role: UserRole,
    /// Whether the current email has been confirmed.
    pub is_email_verified: bool,
    /// Account status.
    pub account_status: AccountStatus,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
    /// Last profile update.
    pub updated_at: Option<DateTime<Utc>>,
    /// Last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Optimistic lock version.
    pub version: i32,
}

impl User {
    /// Returns true if the account may log in.
    #[must_use]
    pub fn can_log_in(&self) -> bool {
        self.account_status == AccountStatus::Active
    }

    /// Returns true for administrators.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Input for registering a new account.
#[derive(Debug, Clone)]
pub struct RegisterUserInput {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Optional display name.
    pub nickname: Option<String>,
}

/// Input for replacing an account's profile.
///
/// Every field is replaced; a `None` nickname clears it.
#[derive(Debug, Clone)]
pub struct UpdateUserInput {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Optional display name.
    pub nickname: Option<String>,
}
