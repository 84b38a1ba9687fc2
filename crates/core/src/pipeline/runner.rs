//! Pipeline implementation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::classifier::IssueClassifier;
use crate::directory::CustomerDirectory;
use crate::drafter::EmailDrafter;
use crate::mailer::{Mailer, OutboundEmail};
use crate::metrics::PIPELINE_STEPS;
use crate::notifier::{Notifier, TicketAlert};
use crate::ticket::{NewTicket, Ticket, TicketStore};
use crate::tracker::{IssueTracker, OpenIssueRequest};

use super::types::{
    Classification, DraftResult, IssueOpened, NotificationResult, PipelineError, SendResult,
    TicketCreated,
};
use super::substitute_product;

/// The six-step ticket pipeline.
pub struct SupportPipeline {
    directory: Arc<dyn CustomerDirectory>,
    store: Arc<dyn TicketStore>,
    classifier: IssueClassifier,
    tracker: Arc<dyn IssueTracker>,
    notifier: Arc<dyn Notifier>,
    drafter: EmailDrafter,
    mailer: Arc<dyn Mailer>,
}

impl SupportPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        directory: Arc<dyn CustomerDirectory>,
        store: Arc<dyn TicketStore>,
        classifier: IssueClassifier,
        tracker: Arc<dyn IssueTracker>,
        notifier: Arc<dyn Notifier>,
        drafter: EmailDrafter,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            directory,
            store,
            classifier,
            tracker,
            notifier,
            drafter,
            mailer,
        }
    }

    fn ticket(&self, id: i64) -> Result<Ticket, PipelineError> {
        self.store
            .get(id)?
            .ok_or(PipelineError::NotFound(id))
    }

    /// Resolved product name, defaulting when the field is absent or empty.
    fn product_or<'a>(ticket: &'a Ticket, default: &'a str) -> &'a str {
        ticket
            .product_purchased
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(default)
    }

    /// Create a ticket from a customer query. The directory lookup is
    /// best-effort: an unknown customer becomes "Guest".
    pub async fn create_ticket(
        &self,
        customer_email: &str,
        description: &str,
        product_purchased: Option<&str>,
    ) -> Result<TicketCreated, PipelineError> {
        let customer_name = self
            .directory
            .lookup(customer_email)
            .map(|p| p.name)
            .unwrap_or_else(|| "Guest".to_string());

        let ticket = self.store.create(NewTicket {
            customer_email: customer_email.to_string(),
            description: description.to_string(),
            product_purchased: Some(product_purchased.unwrap_or("Unknown").to_string()),
        })?;

        info!(ticket_id = ticket.id, %customer_email, "Ticket created");
        PIPELINE_STEPS.with_label_values(&["create", "ok"]).inc();

        Ok(TicketCreated {
            ticket_id: ticket.id,
            customer_email: ticket.customer_email,
            customer_name,
            status: ticket.status,
        })
    }

    /// Classify the ticket description. The classifier never fails; an
    /// unreachable model resolves to "Other", which is persisted like any
    /// other label.
    pub async fn classify(&self, ticket_id: i64) -> Result<Classification, PipelineError> {
        let ticket = self.ticket(ticket_id)?;

        info!(ticket_id, description = %ticket.description, "Classifying issue");
        let label = self.classifier.classify(&ticket.description).await;

        self.store.set_issue_type(ticket_id, label.as_str())?;
        info!(ticket_id, label = label.as_str(), "Issue classified");
        PIPELINE_STEPS.with_label_values(&["classify", "ok"]).inc();

        Ok(Classification {
            ticket_id,
            issue_type: label.as_str().to_string(),
        })
    }

    /// Open a tracker issue for the ticket. The resulting key — sentinel
    /// values included — is persisted unconditionally so downstream steps
    /// always have something to reference.
    pub async fn open_issue(&self, ticket_id: i64) -> Result<IssueOpened, PipelineError> {
        let ticket = self.ticket(ticket_id)?;

        let product = Self::product_or(&ticket, "the product").to_string();
        let description = substitute_product(&ticket.description, &product);
        let issue_type = ticket
            .issue_type
            .clone()
            .unwrap_or_else(|| "Unclassified".to_string());

        let outcome = self
            .tracker
            .open_issue(OpenIssueRequest {
                ticket_id,
                description,
                issue_type,
                product,
                customer_email: ticket.customer_email.clone(),
            })
            .await;

        let key = outcome.key();
        let outcome_label = if outcome.is_created() { "ok" } else { "degraded" };
        PIPELINE_STEPS
            .with_label_values(&["open_issue", outcome_label])
            .inc();

        self.store.set_tracker_key(ticket_id, &key)?;
        info!(ticket_id, %key, "Tracker issue key recorded");

        Ok(IssueOpened {
            ticket_id,
            issue_key: key,
        })
    }

    /// Post the ticket alert to the team channel. Only success is
    /// persisted; a failure is reported back and leaves the stored flag
    /// untouched.
    pub async fn notify(&self, ticket_id: i64) -> Result<NotificationResult, PipelineError> {
        let ticket = self.ticket(ticket_id)?;

        let customer_name = self
            .directory
            .lookup(&ticket.customer_email)
            .map(|p| p.name)
            .unwrap_or_else(|| "Unknown".to_string());

        let product = Self::product_or(&ticket, "the product").to_string();
        let alert = TicketAlert {
            ticket_id,
            customer_name,
            customer_email: ticket.customer_email.clone(),
            issue_type: ticket
                .issue_type
                .clone()
                .unwrap_or_else(|| "Unclassified".to_string()),
            issue_key: ticket
                .tracker_issue_key
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            description: substitute_product(&ticket.description, &product),
            product,
        };

        match self.notifier.notify(&alert).await {
            Ok(()) => {
                self.store.mark_notified(ticket_id)?;
                PIPELINE_STEPS.with_label_values(&["notify", "ok"]).inc();
                Ok(NotificationResult {
                    ticket_id,
                    notification_sent: true,
                    error: None,
                })
            }
            Err(e) => {
                warn!(ticket_id, error = %e, "Notification failed");
                PIPELINE_STEPS.with_label_values(&["notify", "error"]).inc();
                Ok(NotificationResult {
                    ticket_id,
                    notification_sent: false,
                    error: Some(e.to_string()),
                })
            }
        }
    }

    /// Draft the reply email. On failure nothing is persisted and the
    /// stored draft (if any) is left as it was.
    pub async fn draft(&self, ticket_id: i64) -> Result<DraftResult, PipelineError> {
        let ticket = self.ticket(ticket_id)?;

        let customer_name = self
            .directory
            .lookup(&ticket.customer_email)
            .map(|p| p.name)
            .unwrap_or_else(|| "Customer".to_string());
        let issue_type = ticket
            .issue_type
            .clone()
            .unwrap_or_else(|| "technical".to_string());
        let product = Self::product_or(&ticket, "the product");
        let issue_key = ticket
            .tracker_issue_key
            .clone()
            .unwrap_or_else(|| "CUS-XXXX".to_string());

        match self
            .drafter
            .draft(&customer_name, &issue_type, product, &issue_key)
            .await
        {
            Ok(body) => {
                self.store.set_email_draft(ticket_id, &body)?;
                PIPELINE_STEPS.with_label_values(&["draft", "ok"]).inc();
                Ok(DraftResult {
                    ticket_id,
                    draft_email: Some(body),
                    error: None,
                })
            }
            Err(e) => {
                warn!(ticket_id, error = %e, "Drafting failed");
                PIPELINE_STEPS.with_label_values(&["draft", "error"]).inc();
                Ok(DraftResult {
                    ticket_id,
                    draft_email: None,
                    error: Some("Failed to generate email draft".to_string()),
                })
            }
        }
    }

    /// Send the reply email. Same asymmetric persistence as notify: only
    /// success is recorded.
    pub async fn send_email(&self, ticket_id: i64) -> Result<SendResult, PipelineError> {
        let ticket = self.ticket(ticket_id)?;

        let customer_name = self
            .directory
            .lookup(&ticket.customer_email)
            .map(|p| p.name)
            .unwrap_or_else(|| "Customer".to_string());
        let first_name = customer_name
            .split_whitespace()
            .next()
            .unwrap_or("Customer")
            .to_string();
        let issue_type = ticket
            .issue_type
            .clone()
            .unwrap_or_else(|| "Support".to_string());
        let product = Self::product_or(&ticket, "your product").to_string();
        let issue_key = ticket
            .tracker_issue_key
            .clone()
            .unwrap_or_else(|| "N/A".to_string());

        let subject = format!("{} Issue with {}", issue_type, product);
        let email = OutboundEmail {
            to: ticket.customer_email.clone(),
            subject,
            text_body: render_text_body(&first_name, &issue_type, &product, &issue_key),
            html_body: render_html_body(&first_name, &issue_type, &product, &issue_key),
        };

        match self.mailer.send(email).await {
            Ok(()) => {
                self.store.mark_email_sent(ticket_id)?;
                info!(ticket_id, "Reply email sent");
                PIPELINE_STEPS.with_label_values(&["send_email", "ok"]).inc();
                Ok(SendResult {
                    ticket_id,
                    email_sent: true,
                    error: None,
                })
            }
            Err(e) => {
                warn!(ticket_id, error = %e, "Reply email failed");
                PIPELINE_STEPS
                    .with_label_values(&["send_email", "error"])
                    .inc();
                Ok(SendResult {
                    ticket_id,
                    email_sent: false,
                    error: Some(e.to_string()),
                })
            }
        }
    }
}

fn render_text_body(first_name: &str, issue_type: &str, product: &str, issue_key: &str) -> String {
    format!(
        "Hi {first_name},\n\n\
         Thank you for reaching out regarding the {issue_type} issue with your {product}. \
         We've created a support ticket with the ID {issue_key} for easy tracking.\n\n\
         Our team is reviewing your concern and will get back to you within 24 hours. \
         We appreciate your patience and apologize for any inconvenience.\n\n\
         If you have any additional details to share, feel free to reply to this email.\n\n\
         Best regards,\n\
         AI-Orchestrator\n"
    )
}

fn render_html_body(first_name: &str, issue_type: &str, product: &str, issue_key: &str) -> String {
    format!(
        "<html>\n  <body>\n    <p>Hi <strong>{first_name}</strong>,</p>\n\n    <p>\n      \
         Thank you for reaching out regarding the <strong>{issue_type}</strong> issue with your \
         <strong>{product}</strong>. We've created a support ticket with the ID \
         <strong>{issue_key}</strong> for easy tracking.\n    </p>\n\n    <p>\n      \
         Our team is reviewing your concern and will get back to you within <strong>24 hours</strong>. \
         We appreciate your patience and apologize for any inconvenience.\n    </p>\n\n    \
         <p>If you have any additional details to share, feel free to reply to this email.</p>\n\n    \
         <p>Best regards,<br><strong>AI-Orchestrator</strong></p>\n  </body>\n</html>\n"
    )
}
