//! Read-only customer directory.
//!
//! Reference data about customers, loaded once from a CRM export. The
//! pipeline only ever looks profiles up; a miss is not an error.

mod csv_directory;
mod types;

pub use csv_directory::CsvCustomerDirectory;
pub use types::CustomerProfile;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Failed to read customer dataset: {0}")]
    Io(String),

    #[error("Malformed customer record: {0}")]
    Malformed(String),
}

/// Lookup of customer profiles by email.
pub trait CustomerDirectory: Send + Sync {
    fn lookup(&self, email: &str) -> Option<CustomerProfile>;

    /// Number of known customers.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
