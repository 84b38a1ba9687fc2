//! Webhook implementation of the notifier.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};

use crate::config::NotifierConfig;

use super::{Notifier, NotifyError, TicketAlert};

/// Posts alerts as `{"text": ...}` to a fixed webhook endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

impl WebhookNotifier {
    pub fn new(config: NotifierConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            webhook_url: config.webhook_url.filter(|u| !u.is_empty()),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, alert: &TicketAlert) -> Result<(), NotifyError> {
        let url = self.webhook_url.as_ref().ok_or(NotifyError::NotConfigured)?;

        let message = alert.format();
        let response = self
            .client
            .post(url)
            .json(&WebhookPayload { text: &message })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Webhook request failed");
                NotifyError::Transport(e.to_string())
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            error!(status, body = %body, "Webhook rejected notification");
            return Err(NotifyError::Rejected { status, body });
        }

        info!(ticket_id = alert.ticket_id, "Channel notified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> TicketAlert {
        TicketAlert {
            ticket_id: 1,
            customer_name: "Guest".to_string(),
            customer_email: "x@example.com".to_string(),
            issue_type: "Other".to_string(),
            issue_key: "N/A".to_string(),
            product: "the product".to_string(),
            description: "help".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_notifier_reports_not_configured() {
        let notifier = WebhookNotifier::new(NotifierConfig::default());
        let result = notifier.notify(&alert()).await;
        assert!(matches!(result, Err(NotifyError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_empty_url_counts_as_unconfigured() {
        let notifier = WebhookNotifier::new(NotifierConfig {
            webhook_url: Some(String::new()),
            timeout_secs: 5,
        });
        let result = notifier.notify(&alert()).await;
        assert!(matches!(result, Err(NotifyError::NotConfigured)));
    }
}
