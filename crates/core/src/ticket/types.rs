//! Core ticket data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing status of a ticket.
///
/// Each successful pipeline step advances the status monotonically; a
/// re-run of an earlier step never moves it backwards. Step ordering itself
/// is not enforced — every operation is independently invocable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    Classified,
    IssueOpened,
    Notified,
    Drafted,
    Sent,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Classified => "classified",
            TicketStatus::IssueOpened => "issue_opened",
            TicketStatus::Notified => "notified",
            TicketStatus::Drafted => "drafted",
            TicketStatus::Sent => "sent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(TicketStatus::Open),
            "classified" => Some(TicketStatus::Classified),
            "issue_opened" => Some(TicketStatus::IssueOpened),
            "notified" => Some(TicketStatus::Notified),
            "drafted" => Some(TicketStatus::Drafted),
            "sent" => Some(TicketStatus::Sent),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            TicketStatus::Open => 0,
            TicketStatus::Classified => 1,
            TicketStatus::IssueOpened => 2,
            TicketStatus::Notified => 3,
            TicketStatus::Drafted => 4,
            TicketStatus::Sent => 5,
        }
    }

    /// Monotonic advance: returns `reached` only if it is further along.
    pub fn advanced_to(self, reached: TicketStatus) -> TicketStatus {
        if reached.rank() > self.rank() {
            reached
        } else {
            self
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer support ticket and its accumulated processing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Assigned by the store on creation, stable thereafter.
    pub id: i64,
    pub customer_email: String,
    pub description: String,
    pub product_purchased: Option<String>,
    /// Set by classification; overwritten on re-runs.
    pub issue_type: Option<String>,
    /// External issue key, including sentinel values for failed creates.
    pub tracker_issue_key: Option<String>,
    /// Drafted reply body; only set when drafting succeeds.
    pub email_draft: Option<String>,
    pub status: TicketStatus,
    pub notification_sent: bool,
    pub email_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            TicketStatus::Open,
            TicketStatus::Classified,
            TicketStatus::IssueOpened,
            TicketStatus::Notified,
            TicketStatus::Drafted,
            TicketStatus::Sent,
        ] {
            assert_eq!(TicketStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TicketStatus::parse("bogus"), None);
    }

    #[test]
    fn test_status_advance_is_monotonic() {
        let status = TicketStatus::Notified;
        assert_eq!(
            status.advanced_to(TicketStatus::Drafted),
            TicketStatus::Drafted
        );
        // Re-running an earlier step never regresses.
        assert_eq!(
            status.advanced_to(TicketStatus::Classified),
            TicketStatus::Notified
        );
    }
}
