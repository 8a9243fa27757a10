//! Password hashing with Argon2id.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use super::PasswordEncoder;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Hashing produced no usable result.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// `PasswordEncoder` backed by Argon2id with default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordEncoder;

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordError> {
        hash_password(raw)
    }

    fn matches(&self, raw: &str, hash: &str) -> Result<bool, PasswordError> {
        verify_password(raw, hash)
    }
}

/// Hashes a password into a PHC string.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use kitty_core::auth::hash_password;
///
/// let hash = hash_password("Secr3t!pass").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a PHC hash.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the hash cannot be parsed.
/// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_round_trip() {
        let encoder = Argon2PasswordEncoder;
        let hash = encoder.encode("Passw0rd!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(encoder.matches("Passw0rd!", &hash).unwrap());
        assert!(!encoder.matches("passw0rd!", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_fresh_salt() {
        let first = hash_password("Passw0rd!").unwrap();
        let second = hash_password("Passw0rd!").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }
}
