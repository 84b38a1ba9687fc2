//! Batch driver tests against mock collaborators and a temp-file dataset.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tempfile::NamedTempFile;

use supportflow_core::batch::{BatchDriver, BatchError, StepReport};
use supportflow_core::testing::{MockLlm, MockMailer, MockNotifier, MockTracker};
use supportflow_core::{
    CsvCustomerDirectory, EmailDrafter, IssueClassifier, RetryPolicy, SqliteTicketStore,
    SupportPipeline, TicketFilter, TicketStore,
};

fn pipeline_with_store() -> (Arc<SupportPipeline>, Arc<SqliteTicketStore>) {
    let store = Arc::new(SqliteTicketStore::in_memory().unwrap());

    let classifier_llm = Arc::new(MockLlm::new());
    classifier_llm.set_default_response("Technical");
    let drafter_llm = Arc::new(MockLlm::new());
    drafter_llm.set_default_response("Hi, we are looking into it.");

    let pipeline = SupportPipeline::new(
        Arc::new(CsvCustomerDirectory::empty()),
        Arc::clone(&store) as Arc<dyn TicketStore>,
        IssueClassifier::new(classifier_llm, RetryPolicy::new(3, Duration::ZERO)),
        Arc::new(MockTracker::new()),
        Arc::new(MockNotifier::new()),
        EmailDrafter::new(drafter_llm),
        Arc::new(MockMailer::new()),
    );

    (Arc::new(pipeline), store)
}

fn dataset(rows: &[(&str, &str, &str)]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "customer_email,ticket_description,product_purchased").unwrap();
    for (email, description, product) in rows {
        writeln!(file, "{},{},{}", email, description, product).unwrap();
    }
    file.flush().unwrap();
    file
}

fn immediate_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO)
}

#[tokio::test]
async fn test_run_batch_processes_every_sampled_row() {
    let (pipeline, store) = pipeline_with_store();
    let file = dataset(&[
        ("a@x.com", "toaster is dead", "ToasterX"),
        ("b@x.com", "kettle leaks", "KettlePro"),
        ("c@x.com", "mixer whines", "MixMaster"),
    ]);

    let driver = BatchDriver::new(pipeline, Some(file.path().to_path_buf()), immediate_retry());
    let summary = driver.run(3).await.unwrap();

    assert_eq!(summary.processed.len(), 3);

    let mut emails: Vec<_> = summary
        .processed
        .iter()
        .map(|row| row.customer_email.clone())
        .collect();
    emails.sort();
    assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);

    for row in &summary.processed {
        assert!(row.ticket_id.is_some());
        assert!(row.error.is_none());
        assert!(matches!(row.classification, Some(StepReport::Ok(_))));
        assert!(matches!(row.delivery, Some(StepReport::Ok(_))));
    }

    // Every sampled row got a persisted ticket that ran to completion.
    assert_eq!(store.count(&TicketFilter::new()).unwrap(), 3);
    assert_eq!(
        store.count(&TicketFilter::new().with_status("sent")).unwrap(),
        3
    );
}

#[tokio::test]
async fn test_run_batch_subset_samples_without_replacement() {
    let (pipeline, _store) = pipeline_with_store();
    let file = dataset(&[
        ("a@x.com", "one", "P1"),
        ("b@x.com", "two", "P2"),
        ("c@x.com", "three", "P3"),
        ("d@x.com", "four", "P4"),
    ]);

    let driver = BatchDriver::new(pipeline, Some(file.path().to_path_buf()), immediate_retry());
    let summary = driver.run(2).await.unwrap();

    let mut emails: Vec<_> = summary
        .processed
        .iter()
        .map(|row| row.customer_email.clone())
        .collect();
    emails.sort();
    emails.dedup();
    assert_eq!(emails.len(), 2);
}

#[tokio::test]
async fn test_run_batch_classification_and_delivery_are_distinct_keys() {
    let (pipeline, _store) = pipeline_with_store();
    let file = dataset(&[("a@x.com", "toaster is dead", "ToasterX")]);

    let driver = BatchDriver::new(pipeline, Some(file.path().to_path_buf()), immediate_retry());
    let summary = driver.run(1).await.unwrap();

    let json = serde_json::to_value(&summary).unwrap();
    let row = &json["processed"][0];
    // Both step outputs survive under their own names.
    assert_eq!(row["classification"]["issue_type"], "Technical");
    assert_eq!(row["delivery"]["email_sent"], true);
}

#[tokio::test]
async fn test_run_batch_too_many_rows_fails_after_retries() {
    let (pipeline, store) = pipeline_with_store();
    let file = dataset(&[("a@x.com", "one", "P1")]);

    let driver = BatchDriver::new(pipeline, Some(file.path().to_path_buf()), immediate_retry());
    let result = driver.run(5).await;

    assert!(matches!(
        result,
        Err(BatchError::NotEnoughRows {
            requested: 5,
            available: 1
        })
    ));
    // The failing batch never got as far as creating tickets.
    assert_eq!(store.count(&TicketFilter::new()).unwrap(), 0);
}

#[tokio::test]
async fn test_run_batch_without_dataset_configured() {
    let (pipeline, _store) = pipeline_with_store();

    let driver = BatchDriver::new(pipeline, None, immediate_retry());
    let result = driver.run(1).await;

    assert!(matches!(result, Err(BatchError::Dataset(_))));
}
