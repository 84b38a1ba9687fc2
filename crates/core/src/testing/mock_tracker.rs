//! Mock issue tracker for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::tracker::{IssueOutcome, IssueTracker, OpenIssueRequest};

/// Mock implementation of [`IssueTracker`].
pub struct MockTracker {
    outcome: Mutex<IssueOutcome>,
    requests: Arc<Mutex<Vec<OpenIssueRequest>>>,
}

impl Default for MockTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTracker {
    pub fn new() -> Self {
        Self {
            outcome: Mutex::new(IssueOutcome::Created("CUS-1001".to_string())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Outcome returned by every subsequent call.
    pub fn set_outcome(&self, outcome: IssueOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    /// Handle to the recorded open-issue requests.
    pub fn requests(&self) -> Arc<Mutex<Vec<OpenIssueRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    async fn open_issue(&self, request: OpenIssueRequest) -> IssueOutcome {
        self.requests.lock().unwrap().push(request);
        self.outcome.lock().unwrap().clone()
    }
}
