//! SMTP implementation of the mailer.

use async_trait::async_trait;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::EmailConfig;

use super::{MailError, Mailer, OutboundEmail};

/// Mailer over an authenticated STARTTLS relay.
///
/// Each send opens its own session, mirroring the per-call submission of
/// the rest of the pipeline's collaborators.
pub struct SmtpMailer {
    config: Option<EmailConfig>,
}

impl SmtpMailer {
    pub fn new(config: Option<EmailConfig>) -> Self {
        Self { config }
    }

    fn build_message(config: &EmailConfig, email: &OutboundEmail) -> Result<Message, MailError> {
        let from = config
            .from
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.from.clone()))?;
        let to = email
            .to
            .parse()
            .map_err(|_| MailError::InvalidAddress(email.to.clone()))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject)
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        let config = self.config.as_ref().ok_or(MailError::NotConfigured)?;

        let message = Self::build_message(config, &email)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        info!(to = %email.to, subject = %email.subject, "Sending email");
        transport.send(message).await.map_err(|e| {
            error!(error = %e, "Failed to send email");
            MailError::Transport(e.to_string())
        })?;

        info!(to = %email.to, "Email sent");
        Ok(())
    }
}
