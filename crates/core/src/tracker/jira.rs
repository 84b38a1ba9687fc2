//! Jira REST implementation of the issue tracker client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::TrackerConfig;

use super::{IssueOutcome, IssueTracker, OpenIssueRequest};

/// Jira create-issue client.
pub struct JiraClient {
    client: reqwest::Client,
    config: TrackerConfig,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: Option<String>,
}

impl JiraClient {
    pub fn new(config: TrackerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Endpoint, account identity and credential; any missing value puts
    /// the client into config-error mode.
    fn credentials(&self) -> Option<(&str, &str, &str)> {
        let base_url = self.config.base_url.as_deref().filter(|s| !s.is_empty())?;
        let email = self
            .config
            .account_email
            .as_deref()
            .filter(|s| !s.is_empty())?;
        let token = self.config.api_token.as_deref().filter(|s| !s.is_empty())?;
        Some((base_url, email, token))
    }

    fn build_payload(&self, request: &OpenIssueRequest) -> serde_json::Value {
        let summary = format!(
            "[{}] Issue with {} - Ticket #{}",
            request.issue_type, request.product, request.ticket_id
        );

        json!({
            "fields": {
                "project": {"key": self.config.project_key},
                "summary": summary,
                "description": {
                    "type": "doc",
                    "version": 1,
                    "content": [
                        {
                            "type": "paragraph",
                            "content": [
                                {"type": "text", "text": format!("Customer Email: {}\n", request.customer_email)},
                                {"type": "text", "text": format!("Issue Type: {}\n", request.issue_type)},
                                {"type": "text", "text": format!("Product: {}\n", request.product)},
                                {"type": "text", "text": format!("Ticket ID: {}\n\n", request.ticket_id)},
                                {"type": "text", "text": format!("Description:\n{}", request.description)},
                            ]
                        }
                    ]
                },
                "issuetype": {"name": "Task"},
                "labels": ["automated", "customer-support"]
            }
        })
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn open_issue(&self, request: OpenIssueRequest) -> IssueOutcome {
        let Some((base_url, email, token)) = self.credentials() else {
            error!("Missing tracker configuration, not attempting issue creation");
            return IssueOutcome::ConfigMissing;
        };

        let url = format!("{}/rest/api/3/issue", base_url.trim_end_matches('/'));
        let payload = self.build_payload(&request);
        debug!(ticket_id = request.ticket_id, %url, "Opening tracker issue");

        let response = match self
            .client
            .post(&url)
            .basic_auth(email, Some(token))
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Tracker request failed");
                return IssueOutcome::Transport(e.to_string());
            }
        };

        let status = response.status().as_u16();
        if status != 201 {
            let body = response.text().await.unwrap_or_default();
            error!(status, body = %body.chars().take(200).collect::<String>(), "Tracker rejected issue");
            return IssueOutcome::Rejected { status };
        }

        let key = response
            .json::<CreatedIssue>()
            .await
            .ok()
            .and_then(|c| c.key)
            .unwrap_or_else(|| "JIRA-UNKNOWN".to_string());

        info!(%key, ticket_id = request.ticket_id, "Tracker issue created");
        IssueOutcome::Created(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OpenIssueRequest {
        OpenIssueRequest {
            ticket_id: 12,
            description: "My ToasterX won't turn on".to_string(),
            issue_type: "Technical".to_string(),
            product: "ToasterX".to_string(),
            customer_email: "ada@example.com".to_string(),
        }
    }

    fn configured() -> JiraClient {
        JiraClient::new(TrackerConfig {
            base_url: Some("https://example.atlassian.net".to_string()),
            account_email: Some("bot@example.com".to_string()),
            api_token: Some("tok".to_string()),
            project_key: "CUS".to_string(),
            timeout_secs: 10,
        })
    }

    #[tokio::test]
    async fn test_missing_config_short_circuits() {
        let client = JiraClient::new(TrackerConfig::default());
        let outcome = client.open_issue(request()).await;
        assert_eq!(outcome, IssueOutcome::ConfigMissing);
    }

    #[tokio::test]
    async fn test_empty_token_counts_as_missing() {
        let client = JiraClient::new(TrackerConfig {
            base_url: Some("https://example.atlassian.net".to_string()),
            account_email: Some("bot@example.com".to_string()),
            api_token: Some(String::new()),
            project_key: "CUS".to_string(),
            timeout_secs: 10,
        });
        let outcome = client.open_issue(request()).await;
        assert_eq!(outcome, IssueOutcome::ConfigMissing);
    }

    #[test]
    fn test_payload_shape() {
        let client = configured();
        let payload = client.build_payload(&request());

        assert_eq!(payload["fields"]["project"]["key"], "CUS");
        assert_eq!(
            payload["fields"]["summary"],
            "[Technical] Issue with ToasterX - Ticket #12"
        );
        assert_eq!(payload["fields"]["issuetype"]["name"], "Task");
        assert_eq!(payload["fields"]["labels"][0], "automated");
        assert_eq!(payload["fields"]["labels"][1], "customer-support");
        assert_eq!(payload["fields"]["description"]["type"], "doc");

        let body = payload["fields"]["description"]["content"][0]["content"]
            .as_array()
            .unwrap();
        assert!(body
            .iter()
            .any(|t| t["text"].as_str().unwrap().contains("ada@example.com")));
        assert!(body
            .iter()
            .any(|t| t["text"].as_str().unwrap().contains("My ToasterX won't turn on")));
    }
}
