//! Mock notifier for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::notifier::{Notifier, NotifyError, TicketAlert};

/// Mock implementation of [`Notifier`]. Succeeds unless errors are queued;
/// delivered alerts are recorded either way.
pub struct MockNotifier {
    errors: Mutex<VecDeque<NotifyError>>,
    alerts: Arc<Mutex<Vec<TicketAlert>>>,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            errors: Mutex::new(VecDeque::new()),
            alerts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a failure for the next call.
    pub fn push_error(&self, error: NotifyError) {
        self.errors.lock().unwrap().push_back(error);
    }

    /// Handle to the recorded alerts (including failed attempts).
    pub fn alerts(&self) -> Arc<Mutex<Vec<TicketAlert>>> {
        Arc::clone(&self.alerts)
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, alert: &TicketAlert) -> Result<(), NotifyError> {
        self.alerts.lock().unwrap().push(alert.clone());

        match self.errors.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
