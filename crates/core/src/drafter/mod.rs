//! Reply email drafting.

use std::sync::Arc;

use tracing::{info, warn};

use crate::llm::{CompletionRequest, LlmClient, LlmError};

const SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";
const DRAFT_TEMPERATURE: f32 = 0.7;

/// LLM-backed drafter. No retry: a failed draft is reported to the caller
/// and nothing is persisted.
pub struct EmailDrafter {
    llm: Arc<dyn LlmClient>,
}

impl EmailDrafter {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    fn build_prompt(customer_name: &str, issue_type: &str, product: &str, issue_key: &str) -> String {
        let first_name = customer_name.split_whitespace().next().unwrap_or("Customer");
        format!(
            "Write a short and professional email reply to a customer named {first_name} who is facing a '{issue_type}' issue \
             related to their '{product}'. Inform them that a support ticket with ID '{issue_key}' has been created \
             and the team will get back within 24 hours. Use a helpful and courteous tone. Sign the email as 'AI-Orchestrator'."
        )
    }

    /// Draft a reply body. An empty completion counts as a failure.
    pub async fn draft(
        &self,
        customer_name: &str,
        issue_type: &str,
        product: &str,
        issue_key: &str,
    ) -> Result<String, LlmError> {
        let request =
            CompletionRequest::new(Self::build_prompt(customer_name, issue_type, product, issue_key))
                .with_system(SYSTEM_PROMPT)
                .with_temperature(DRAFT_TEMPERATURE);

        let response = self.llm.complete(request).await.map_err(|e| {
            warn!(error = %e, "Failed to generate email draft");
            e
        })?;

        let body = response.text.trim().to_string();
        if body.is_empty() {
            warn!("Drafting model returned an empty reply");
            return Err(LlmError::Json("empty draft".to_string()));
        }

        info!("Draft email generated");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLlm;

    #[tokio::test]
    async fn test_draft_returns_trimmed_body() {
        let llm = MockLlm::new();
        llm.push_response("  Hi Ada,\n\nWe're on it.\n  ");
        let drafter = EmailDrafter::new(Arc::new(llm));

        let body = drafter
            .draft("Ada Lovelace", "Technical", "ToasterX", "CUS-7")
            .await
            .unwrap();
        assert_eq!(body, "Hi Ada,\n\nWe're on it.");
    }

    #[tokio::test]
    async fn test_prompt_uses_first_name_and_fields() {
        let llm = MockLlm::new();
        llm.push_response("ok");
        let requests = llm.requests();
        let drafter = EmailDrafter::new(Arc::new(llm));

        drafter
            .draft("Ada Lovelace", "Billing", "ToasterX", "CUS-7")
            .await
            .unwrap();

        let recorded = requests.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].prompt.contains("named Ada "));
        assert!(!recorded[0].prompt.contains("Lovelace"));
        assert!(recorded[0].prompt.contains("'Billing'"));
        assert!(recorded[0].prompt.contains("'CUS-7'"));
        assert_eq!(recorded[0].temperature, DRAFT_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_blank_name_falls_back_to_customer() {
        let llm = MockLlm::new();
        llm.push_response("ok");
        let requests = llm.requests();
        let drafter = EmailDrafter::new(Arc::new(llm));

        drafter.draft("", "Technical", "X", "K-1").await.unwrap();

        let recorded = requests.lock().unwrap();
        assert!(recorded[0].prompt.contains("named Customer "));
    }

    #[tokio::test]
    async fn test_empty_completion_is_an_error() {
        let llm = MockLlm::new();
        llm.push_response("   ");
        let drafter = EmailDrafter::new(Arc::new(llm));

        let result = drafter.draft("Ada", "Technical", "X", "K-1").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_client_error_propagates() {
        let llm = MockLlm::new();
        llm.push_error(crate::llm::LlmError::NotConfigured);
        let drafter = EmailDrafter::new(Arc::new(llm));

        let result = drafter.draft("Ada", "Technical", "X", "K-1").await;
        assert!(matches!(result, Err(LlmError::NotConfigured)));
    }
}
