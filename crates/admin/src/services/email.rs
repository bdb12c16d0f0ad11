//! Email service for customer notifications.
//!
//! Uses SMTP via lettre for delivery. Plain-text messages; the web front
//! end owns all rich presentation.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for transactional notifications.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay is misconfigured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Tell a customer their package has been handed to the carrier.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be built or sent.
    pub async fn send_package_dispatched(
        &self,
        to: &str,
        tracking_reference: &str,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Bonjour,\n\n\
             Your package has been handed to the carrier.\n\
             Tracking reference: {tracking_reference}\n\n\
             Maison Ondine"
        );

        self.send_plain_text(to, "Your package is on its way", &body)
            .await
    }

    /// Tell a customer their return has been refunded to their wallet.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be built or sent.
    pub async fn send_refund_confirmation(
        &self,
        to: &str,
        order_number: &str,
        amount: Decimal,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Bonjour,\n\n\
             Your return for order {order_number} has been refunded.\n\
             {amount:.2} was credited to your wallet.\n\n\
             Maison Ondine"
        );

        self.send_plain_text(to, "Your return has been refunded", &body)
            .await
    }

    async fn send_plain_text(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_owned()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_owned())?;

        self.mailer.send(message).await?;

        Ok(())
    }
}
