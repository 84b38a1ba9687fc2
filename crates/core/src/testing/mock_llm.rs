//! Mock LLM client for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};

/// Mock implementation of [`LlmClient`].
///
/// Queued responses and errors are played back in order; once the queue is
/// empty the default response (if any) is repeated. Every request is
/// recorded for assertions.
pub struct MockLlm {
    queue: Mutex<VecDeque<Result<String, LlmError>>>,
    default_response: Mutex<Option<String>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlm {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            default_response: Mutex::new(None),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful completion.
    pub fn push_response(&self, text: &str) {
        self.queue.lock().unwrap().push_back(Ok(text.to_string()));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: LlmError) {
        self.queue.lock().unwrap().push_back(Err(error));
    }

    /// Response to repeat once the queue is drained.
    pub fn set_default_response(&self, text: &str) {
        *self.default_response.lock().unwrap() = Some(text.to_string());
    }

    /// Handle to the recorded requests.
    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);

        let next = self.queue.lock().unwrap().pop_front();
        let text = match next {
            Some(Ok(text)) => text,
            Some(Err(e)) => return Err(e),
            None => match self.default_response.lock().unwrap().clone() {
                Some(text) => text,
                None => return Err(LlmError::Http("mock: no response queued".to_string())),
            },
        };

        Ok(CompletionResponse {
            text,
            model: "mock".to_string(),
        })
    }
}
