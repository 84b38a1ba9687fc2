//! Ticket storage trait and request types.

use thiserror::Error;

use super::Ticket;

/// Error type for ticket operations.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Ticket not found: {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(String),
}

/// Request to create a new ticket.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub customer_email: String,
    pub description: String,
    pub product_purchased: Option<String>,
}

/// Filter for querying tickets.
#[derive(Debug, Clone)]
pub struct TicketFilter {
    /// Filter by status string (e.g. "open").
    pub status: Option<String>,
    /// Maximum number of results.
    pub limit: i64,
    /// Offset for pagination.
    pub offset: i64,
}

impl Default for TicketFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketFilter {
    pub fn new() -> Self {
        Self {
            status: None,
            limit: 100,
            offset: 0,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for ticket storage backends.
///
/// Every mutation is an idempotent overwrite: re-running a step writes the
/// latest value and applies the monotonic status advance.
pub trait TicketStore: Send + Sync {
    /// Create a new ticket with status `Open`.
    fn create(&self, request: NewTicket) -> Result<Ticket, TicketError>;

    /// Get a ticket by id.
    fn get(&self, id: i64) -> Result<Option<Ticket>, TicketError>;

    /// List tickets matching the filter, newest first.
    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError>;

    /// Count tickets matching the filter.
    fn count(&self, filter: &TicketFilter) -> Result<i64, TicketError>;

    /// Record the classification label.
    fn set_issue_type(&self, id: i64, issue_type: &str) -> Result<Ticket, TicketError>;

    /// Record the external issue key (sentinel values included).
    fn set_tracker_key(&self, id: i64, key: &str) -> Result<Ticket, TicketError>;

    /// Record that the team channel was notified.
    fn mark_notified(&self, id: i64) -> Result<Ticket, TicketError>;

    /// Record the drafted reply body.
    fn set_email_draft(&self, id: i64, draft: &str) -> Result<Ticket, TicketError>;

    /// Record that the reply email went out.
    fn mark_email_sent(&self, id: i64) -> Result<Ticket, TicketError>;
}
