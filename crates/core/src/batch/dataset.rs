//! Query dataset loading and sampling.

use std::path::Path;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::BatchError;

/// One candidate customer query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub customer_email: String,
    #[serde(default)]
    pub ticket_description: Option<String>,
    #[serde(default)]
    pub product_purchased: Option<String>,
}

impl QueryRecord {
    /// Description with the dataset's fallback for blank cells.
    pub fn description(&self) -> String {
        self.ticket_description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "No description provided".to_string())
    }
}

/// Load all query rows from a CSV with columns `customer_email`,
/// `ticket_description`, `product_purchased`.
pub fn load_queries(path: &Path) -> Result<Vec<QueryRecord>, BatchError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| BatchError::Dataset(e.to_string()))?;

    let mut records = Vec::new();
    for record in reader.deserialize::<QueryRecord>() {
        records.push(record.map_err(|e| BatchError::Dataset(e.to_string()))?);
    }

    Ok(records)
}

/// Draw `count` rows without replacement.
pub fn sample_queries(records: &[QueryRecord], count: usize) -> Result<Vec<QueryRecord>, BatchError> {
    if count > records.len() {
        return Err(BatchError::NotEnoughRows {
            requested: count,
            available: records.len(),
        });
    }

    let mut rng = rand::thread_rng();
    Ok(records.choose_multiple(&mut rng, count).cloned().collect())
}
