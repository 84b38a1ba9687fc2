//! Support ticket classification.
//!
//! Maps a free-text ticket description onto one label from the fixed
//! category set. Failures never escape this module: an unreachable or
//! unparseable model resolves to [`IssueCategory::Other`].

mod types;

pub use types::IssueCategory;

use std::sync::Arc;

use tracing::{info, warn};

use crate::llm::{CompletionRequest, LlmClient};
use crate::retry::RetryPolicy;

const SYSTEM_PROMPT: &str = "You classify support queries into clean, standard labels.";

/// LLM-backed classifier with a bounded retry on transport errors.
pub struct IssueClassifier {
    llm: Arc<dyn LlmClient>,
    retry: RetryPolicy,
}

impl IssueClassifier {
    pub fn new(llm: Arc<dyn LlmClient>, retry: RetryPolicy) -> Self {
        Self { llm, retry }
    }

    fn build_prompt(description: &str) -> String {
        format!(
            "You're a professional support ticket classifier. Given the customer message below, \
             respond with ONLY the most relevant category label — just one or two words — \
             from the following industry-standard types:\n\
             Billing, Technical, Refund, Account, Shipping, Login, Feature Request, Bug Report, Complaint, Other.\n\n\
             Customer message:\n{description}\n\n\
             Respond ONLY with the best matching label, no explanation, no quotes, no punctuation."
        )
    }

    /// Classify a ticket description. Never fails: transport errors are
    /// retried per the policy, and anything unrecoverable or unparseable
    /// falls back to `Other`.
    pub async fn classify(&self, description: &str) -> IssueCategory {
        let request = CompletionRequest::new(Self::build_prompt(description))
            .with_system(SYSTEM_PROMPT)
            .with_temperature(0.0);

        // Only transport faults are worth another attempt; everything else
        // resolves to Other immediately.
        let outcome = self
            .retry
            .run(|| {
                let request = request.clone();
                async {
                    match self.llm.complete(request).await {
                        Ok(response) => Ok(Some(response.text)),
                        Err(e) if e.is_transient() => Err(e),
                        Err(e) => {
                            warn!(error = %e, "Classification failed, falling back to Other");
                            Ok(None)
                        }
                    }
                }
            })
            .await;

        match outcome {
            Ok(Some(text)) => {
                let label = IssueCategory::extract(&text);
                info!(label = label.as_str(), "Issue classified");
                label
            }
            Ok(None) => IssueCategory::Other,
            Err(e) => {
                warn!(error = %e, "Classification attempts exhausted, falling back to Other");
                IssueCategory::Other
            }
        }
    }
}
