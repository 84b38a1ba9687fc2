//! Team-channel notification client.
//!
//! Posts one formatted alert per ticket to a webhook. Failure is reported
//! to the caller, never raised, and never persisted by the pipeline.

mod webhook;

pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notifier not configured")]
    NotConfigured,

    #[error("Webhook rejected message: {status} - {body}")]
    Rejected { status: u16, body: String },

    #[error("Webhook request failed: {0}")]
    Transport(String),
}

/// Everything that goes into one channel alert.
#[derive(Debug, Clone)]
pub struct TicketAlert {
    pub ticket_id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub issue_type: String,
    pub issue_key: String,
    pub product: String,
    pub description: String,
}

impl TicketAlert {
    /// The message body posted to the channel.
    pub fn format(&self) -> String {
        format!(
            ":rotating_light: *New Support Ticket Created*\n\n\
             *Customer:* {}  \n\
             *Email:* `{}`  \n\
             *Issue Type:* `{}`  \n\
             *Product:* `{}`  \n\
             *Ticket ID:* `{}`  \n\
             *Tracker Issue:* `{}`\n\n\
             *Description:*\n{}\n\n\
             Please review and take appropriate action.",
            self.customer_name,
            self.customer_email,
            self.issue_type,
            self.product,
            self.ticket_id,
            self.issue_key,
            self.description,
        )
    }
}

/// Trait for notification backends.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &TicketAlert) -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_format_contains_all_fields() {
        let alert = TicketAlert {
            ticket_id: 7,
            customer_name: "Ada Lovelace".to_string(),
            customer_email: "ada@example.com".to_string(),
            issue_type: "Technical".to_string(),
            issue_key: "CUS-99".to_string(),
            product: "ToasterX".to_string(),
            description: "My ToasterX won't turn on".to_string(),
        };

        let message = alert.format();
        assert!(message.contains("Ada Lovelace"));
        assert!(message.contains("`ada@example.com`"));
        assert!(message.contains("`Technical`"));
        assert!(message.contains("`CUS-99`"));
        assert!(message.contains("`7`"));
        assert!(message.contains("My ToasterX won't turn on"));
    }
}
