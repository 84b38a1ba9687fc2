//! Batch driver.
//!
//! Samples customer queries from a dataset and drives each one through the
//! full six-step pipeline, sequentially and synchronously. The whole batch
//! body sits inside the bounded retry — a dataset-level fault re-runs the
//! entire call, with no per-row isolation. Step-level faults never reach
//! the retry: they are absorbed into the per-row reports.

mod dataset;

pub use dataset::{load_queries, sample_queries, QueryRecord};

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::metrics::BATCH_RUNS;
use crate::pipeline::{
    Classification, DraftResult, IssueOpened, NotificationResult, PipelineError, SendResult,
    SupportPipeline, TicketCreated,
};
use crate::retry::RetryPolicy;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to read query dataset: {0}")]
    Dataset(String),

    #[error("Requested {requested} queries but dataset has {available}")]
    NotEnoughRows { requested: usize, available: usize },
}

/// A single step's contribution to a row report: either the step result or
/// the error it surfaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepReport<T> {
    Ok(T),
    Err { error: String },
}

impl<T> From<Result<T, PipelineError>> for StepReport<T> {
    fn from(result: Result<T, PipelineError>) -> Self {
        match result {
            Ok(value) => StepReport::Ok(value),
            Err(e) => StepReport::Err {
                error: e.to_string(),
            },
        }
    }
}

/// One sampled row's aggregated results, keyed by the row's email.
///
/// The classification result and the mail-delivery result are deliberately
/// stored under distinct names; the system this replaces wrote both to the
/// same key so one silently clobbered the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowReport {
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation: Option<TicketCreated>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<StepReport<Classification>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<StepReport<IssueOpened>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<StepReport<NotificationResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<StepReport<DraftResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<StepReport<SendResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RowReport {
    fn failed(customer_email: String, error: String) -> Self {
        Self {
            customer_email,
            ticket_id: None,
            creation: None,
            classification: None,
            issue: None,
            notification: None,
            draft: None,
            delivery: None,
            error: Some(error),
        }
    }
}

/// Summary of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub processed: Vec<RowReport>,
}

/// Drives sampled queries through the pipeline.
pub struct BatchDriver {
    pipeline: Arc<SupportPipeline>,
    dataset_path: Option<PathBuf>,
    retry: RetryPolicy,
}

impl BatchDriver {
    pub fn new(pipeline: Arc<SupportPipeline>, dataset_path: Option<PathBuf>, retry: RetryPolicy) -> Self {
        Self {
            pipeline,
            dataset_path,
            retry,
        }
    }

    /// Run the pipeline for `count` random queries drawn without
    /// replacement from the dataset. The entire batch is retried on any
    /// dataset-level fault.
    pub async fn run(&self, count: usize) -> Result<BatchSummary, BatchError> {
        let result = self.retry.run(|| self.run_once(count)).await;

        match &result {
            Ok(summary) => {
                BATCH_RUNS.with_label_values(&["ok"]).inc();
                info!(rows = summary.processed.len(), "Batch pipeline complete");
            }
            Err(e) => {
                BATCH_RUNS.with_label_values(&["error"]).inc();
                error!(error = %e, "Batch pipeline failed");
            }
        }

        result
    }

    async fn run_once(&self, count: usize) -> Result<BatchSummary, BatchError> {
        let path = self.dataset_path.as_ref().ok_or_else(|| {
            BatchError::Dataset("no queries dataset configured".to_string())
        })?;

        let records = load_queries(path)?;
        let chosen = sample_queries(&records, count)?;

        let mut processed = Vec::with_capacity(chosen.len());
        for record in chosen {
            info!(customer_email = %record.customer_email, "Starting pipeline for query");
            processed.push(self.process_row(record).await);
        }

        Ok(BatchSummary { processed })
    }

    /// Run the six steps for one row. A failed creation fails the row;
    /// later rows still run. Every other step's outcome — success or error
    /// — lands in the report and the sequence continues.
    async fn process_row(&self, record: QueryRecord) -> RowReport {
        let customer_email = record.customer_email.clone();
        let description = record.description();

        let created = match self
            .pipeline
            .create_ticket(
                &record.customer_email,
                &description,
                record.product_purchased.as_deref(),
            )
            .await
        {
            Ok(created) => created,
            Err(e) => {
                error!(customer_email = %customer_email, error = %e, "Ticket creation failed");
                return RowReport::failed(customer_email, "Ticket creation failed".to_string());
            }
        };
        let ticket_id = created.ticket_id;

        let classification = StepReport::from(self.pipeline.classify(ticket_id).await);
        let issue = StepReport::from(self.pipeline.open_issue(ticket_id).await);
        let notification = StepReport::from(self.pipeline.notify(ticket_id).await);
        let draft = StepReport::from(self.pipeline.draft(ticket_id).await);
        let delivery = StepReport::from(self.pipeline.send_email(ticket_id).await);

        RowReport {
            customer_email,
            ticket_id: Some(ticket_id),
            creation: Some(created),
            classification: Some(classification),
            issue: Some(issue),
            notification: Some(notification),
            draft: Some(draft),
            delivery: Some(delivery),
            error: None,
        }
    }
}
