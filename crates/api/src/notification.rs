//! Verification mail delivery.

use kitty_core::user::EmailVerificationSender;
use kitty_shared::EmailService;
use tracing::{info, warn};

/// Delivers verification mail over SMTP, or only logs it when email is disabled.
#[derive(Debug, Clone)]
pub enum VerificationMailer {
    /// Send through the configured SMTP relay.
    Smtp(EmailService),
    /// Log the recipient and send nothing.
    LogOnly,
}

impl VerificationMailer {
    /// Picks SMTP delivery when the service is enabled in config.
    #[must_use]
    pub fn from_service(service: EmailService) -> Self {
        if service.config().enabled {
            Self::Smtp(service)
        } else {
            Self::LogOnly
        }
    }
}

impl EmailVerificationSender for VerificationMailer {
    async fn send_verification(&self, email: &str) {
        match self {
            Self::Smtp(service) => {
                if let Err(e) = service.send_verification_email(email).await {
                    warn!(error = %e, to = %email, "Failed to send verification email");
                }
            }
            Self::LogOnly => {
                info!(to = %email, "Email delivery disabled, skipping verification email");
            }
        }
    }
}
