pub mod batch;
pub mod classifier;
pub mod config;
pub mod directory;
pub mod drafter;
pub mod llm;
pub mod mailer;
pub mod metrics;
pub mod notifier;
pub mod pipeline;
pub mod retry;
pub mod testing;
pub mod ticket;
pub mod tracker;

pub use batch::{BatchDriver, BatchError, BatchSummary, QueryRecord, RowReport, StepReport};
pub use classifier::{IssueCategory, IssueClassifier};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use directory::{CsvCustomerDirectory, CustomerDirectory, CustomerProfile, DirectoryError};
pub use drafter::EmailDrafter;
pub use llm::{ChatCompletionsClient, CompletionRequest, CompletionResponse, LlmClient, LlmError};
pub use mailer::{MailError, Mailer, OutboundEmail, SmtpMailer};
pub use metrics::register_core_metrics;
pub use notifier::{Notifier, NotifyError, TicketAlert, WebhookNotifier};
pub use pipeline::{
    Classification, DraftResult, IssueOpened, NotificationResult, PipelineError, SendResult,
    SupportPipeline, TicketCreated,
};
pub use retry::RetryPolicy;
pub use ticket::{
    NewTicket, SqliteTicketStore, Ticket, TicketError, TicketFilter, TicketStatus, TicketStore,
};
pub use tracker::{IssueOutcome, IssueTracker, JiraClient, OpenIssueRequest};
