//! Issue tracker client (Jira-style REST create-issue).
//!
//! This client never raises past its boundary: every failure mode is a
//! variant of [`IssueOutcome`], and the sentinel strings stored on the
//! ticket are rendered from it at the persistence edge.

mod jira;

pub use jira::JiraClient;

use async_trait::async_trait;

/// Fields sent when opening a tracked issue.
#[derive(Debug, Clone)]
pub struct OpenIssueRequest {
    pub ticket_id: i64,
    pub description: String,
    pub issue_type: String,
    pub product: String,
    pub customer_email: String,
}

/// Result of an attempt to open an issue. Failures carry enough to tell
/// "misconfigured", "upstream rejected" and "transport failed" apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// The tracker accepted the issue and returned its key.
    Created(String),
    /// Required configuration is missing; no call was attempted.
    ConfigMissing,
    /// The tracker answered with a non-created status.
    Rejected { status: u16 },
    /// The call itself failed.
    Transport(String),
}

impl IssueOutcome {
    /// The key persisted on the ticket. Failure variants render the
    /// sentinel strings so downstream steps always have a value to read.
    pub fn key(&self) -> String {
        match self {
            IssueOutcome::Created(key) => key.clone(),
            IssueOutcome::ConfigMissing => "JIRA-CONFIG-ERROR".to_string(),
            IssueOutcome::Rejected { status } => format!("JIRA-ERROR-{}", status),
            IssueOutcome::Transport(message) => format!("JIRA-EXCEPTION: {}", message),
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, IssueOutcome::Created(_))
    }
}

/// Trait for issue tracker backends.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn open_issue(&self, request: OpenIssueRequest) -> IssueOutcome;
}
