//! Email service for sending transactional emails.
//!
//! Uses `lettre` for SMTP transport.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::Mailbox,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tracing::debug;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Debug, Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this service was built with.
    #[must_use]
    pub const fn config(&self) -> &EmailConfig {
        &self.config
    }

    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        Ok(transport)
    }

    /// Link the recipient follows to confirm `email`, with the address percent-encoded.
    #[must_use]
    pub fn verification_link(&self, email: &str) -> String {
        format!(
            "{}/verify-email?email={}",
            self.config.frontend_url.trim_end_matches('/'),
            urlencoding::encode(email)
        )
    }

    /// Builds the account verification message for an address.
    ///
    /// # Errors
    ///
    /// Returns an error if either address cannot be parsed.
    pub fn build_verification_email(&self, to_email: &str) -> Result<Message, EmailError> {
        let verification_url = self.verification_link(to_email);

        let body = format!(
            r"Hi,

Welcome to Kitty! Please confirm your email address by opening the link below:

{verification_url}

If you did not create a Kitty account, you can ignore this email.

The Kitty Team"
        );

        self.build_message(to_email, "Verify your email address - Kitty", &body)
    }

    fn build_message(&self, to_email: &str, subject: &str, body: &str) -> Result<Message, EmailError> {
        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?;
        let to: Mailbox = to_email
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }

    /// Sends an email verification message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or delivered.
    pub async fn send_verification_email(&self, to_email: &str) -> Result<(), EmailError> {
        let message = self.build_verification_email(to_email)?;
        let transport = self.create_transport()?;

        transport
            .send(message)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        debug!(to = %to_email, "Verification email sent");
        Ok(())
    }
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
