//! The ticket pipeline.
//!
//! Sequences one ticket's lifecycle — create, classify, open a tracker
//! issue, notify the channel, draft a reply, send it — and exposes each
//! step as an independently invocable operation so a single failed step
//! can be retried without re-running the sequence. Persistence happens
//! after every step; external failures surface as result fields, never as
//! errors.

mod runner;
mod types;

pub use runner::SupportPipeline;
pub use types::{
    Classification, DraftResult, IssueOpened, NotificationResult, PipelineError, SendResult,
    TicketCreated,
};

/// Replace the `{product_purchased}` placeholder with the resolved product
/// name.
pub(crate) fn substitute_product(description: &str, product: &str) -> String {
    description.replace("{product_purchased}", product)
}
