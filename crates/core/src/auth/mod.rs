//! Roles, account status and password hashing.
//!
//! This module provides:
//! - The `PasswordEncoder` port and its Argon2id implementation
//! - Account roles and statuses

mod password;

pub use password::{Argon2PasswordEncoder, PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// Turns plaintext passwords into stored hashes and checks them later.
pub trait PasswordEncoder: Send + Sync {
    /// Hashes a plaintext password.
    fn encode(&self, raw: &str) -> Result<String, PasswordError>;

    /// Returns true if `raw` matches the stored `hash`.
    fn matches(&self, raw: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular account.
    #[default]
    User,
    /// Can read and modify every group and expense.
    Admin,
}

impl UserRole {
    /// Returns the wire value used in tokens and the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parses a wire value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns true for administrators.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status. Only active accounts may log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Usable account.
    #[default]
    Active,
    /// Deactivated by its owner.
    Inactive,
    /// Blocked by an administrator.
    Blocked,
}

impl AccountStatus {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Blocked => "blocked",
        }
    }
}
