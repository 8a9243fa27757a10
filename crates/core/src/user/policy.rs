//! Password and nickname rules.

use serde::Serialize;

use super::error::UserError;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A single password requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PasswordCriterion {
    /// At least eight characters.
    Length,
    /// At least one upper case letter.
    OneUpperCase,
    /// At least one lower case letter.
    OneLowerCase,
    /// At least one digit.
    OneNumber,
    /// At least one ASCII punctuation character.
    OneSpecialCharacter,
    /// No whitespace anywhere.
    NoSpace,
}

impl PasswordCriterion {
    /// All criteria in reporting order.
    pub const ALL: [Self; 6] = [
        Self::Length,
        Self::OneUpperCase,
        Self::OneLowerCase,
        Self::OneNumber,
        Self::OneSpecialCharacter,
        Self::NoSpace,
    ];

    /// Returns the criterion name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Length => "LENGTH",
            Self::OneUpperCase => "ONE_UPPER_CASE",
            Self::OneLowerCase => "ONE_LOWER_CASE",
            Self::OneNumber => "ONE_NUMBER",
            Self::OneSpecialCharacter => "ONE_SPECIAL_CHARACTER",
            Self::NoSpace => "NO_SPACE",
        }
    }

    fn is_met_by(self, password: &str) -> bool {
        match self {
            Self::Length => password.chars().count() >= MIN_PASSWORD_LENGTH,
            Self::OneUpperCase => password.chars().any(char::is_uppercase),
            Self::OneLowerCase => password.chars().any(char::is_lowercase),
            Self::OneNumber => password.chars().any(|c| c.is_ascii_digit()),
            Self::OneSpecialCharacter => password.chars().any(|c| c.is_ascii_punctuation()),
            Self::NoSpace => !password.chars().any(char::is_whitespace),
        }
    }
}

/// Returns every criterion the password fails, in reporting order.
#[must_use]
pub fn check_password(password: &str) -> Vec<PasswordCriterion> {
    PasswordCriterion::ALL
        .into_iter()
        .filter(|criterion| !criterion.is_met_by(password))
        .collect()
}

/// Fails with the full list of unmet criteria.
pub fn validate_password(password: &str) -> Result<(), UserError> {
    let failed = check_password(password);
    if failed.is_empty() {
        Ok(())
    } else {
        Err(UserError::PasswordValidation(failed))
    }
}

/// A present nickname must contain something other than whitespace.
pub fn validate_nickname(nickname: Option<&str>) -> Result<(), UserError> {
    match nickname {
        Some(nick) if nick.trim().is_empty() => Err(UserError::NicknameValidation),
        _ => Ok(()),
    }
}
