//! Mock mailer for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::mailer::{MailError, Mailer, OutboundEmail};

/// Mock implementation of [`Mailer`]. Succeeds unless errors are queued;
/// attempted sends are recorded either way.
pub struct MockMailer {
    errors: Mutex<VecDeque<MailError>>,
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            errors: Mutex::new(VecDeque::new()),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a failure for the next call.
    pub fn push_error(&self, error: MailError) {
        self.errors.lock().unwrap().push_back(error);
    }

    /// Handle to the attempted sends.
    pub fn sent(&self) -> Arc<Mutex<Vec<OutboundEmail>>> {
        Arc::clone(&self.sent)
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);

        match self.errors.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
