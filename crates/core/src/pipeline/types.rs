//! Pipeline step result types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ticket::{TicketError, TicketStatus};

/// The pipeline's only hard error surface. Everything an external
/// collaborator can do wrong is reported inside the step results instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Ticket not found: {0}")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<TicketError> for PipelineError {
    fn from(e: TicketError) -> Self {
        match e {
            TicketError::NotFound(id) => PipelineError::NotFound(id),
            TicketError::Database(msg) => PipelineError::Storage(msg),
        }
    }
}

/// Result of creating a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCreated {
    pub ticket_id: i64,
    pub customer_email: String,
    pub customer_name: String,
    pub status: TicketStatus,
}

/// Result of classifying a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub ticket_id: i64,
    pub issue_type: String,
}

/// Result of opening a tracker issue. The key is always present, sentinel
/// values included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueOpened {
    pub ticket_id: i64,
    pub issue_key: String,
}

/// Result of a channel notification attempt. Only success is persisted;
/// a failed attempt leaves no durable trace, so a retry looks identical to
/// a first attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub ticket_id: i64,
    pub notification_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of drafting the reply email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftResult {
    pub ticket_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of sending the reply email. Same asymmetric persistence as
/// notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResult {
    pub ticket_id: i64,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
