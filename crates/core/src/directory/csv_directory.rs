//! CSV-backed customer directory.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use super::{CustomerDirectory, CustomerProfile, DirectoryError};

/// In-process directory loaded from a CRM CSV export.
///
/// Duplicate emails keep the first record seen, matching how the dataset is
/// deduplicated at seed time.
pub struct CsvCustomerDirectory {
    profiles: HashMap<String, CustomerProfile>,
}

impl CsvCustomerDirectory {
    /// Load the directory from a CSV file with the CRM export columns
    /// (Customer Email, Customer Name, Customer Age, Customer Gender).
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| DirectoryError::Io(e.to_string()))?;

        let mut profiles = HashMap::new();
        for record in reader.deserialize::<CustomerProfile>() {
            let profile = record.map_err(|e| DirectoryError::Malformed(e.to_string()))?;
            profiles
                .entry(profile.email.clone())
                .or_insert(profile);
        }

        info!(customers = profiles.len(), "Customer directory loaded");
        Ok(Self { profiles })
    }

    /// An empty directory; every lookup misses. Used when no dataset is
    /// configured.
    pub fn empty() -> Self {
        Self {
            profiles: HashMap::new(),
        }
    }

    /// Build a directory from already-parsed profiles (useful for testing).
    pub fn from_profiles(profiles: Vec<CustomerProfile>) -> Self {
        let mut map = HashMap::new();
        for profile in profiles {
            map.entry(profile.email.clone()).or_insert(profile);
        }
        Self { profiles: map }
    }
}

impl CustomerDirectory for CsvCustomerDirectory {
    fn lookup(&self, email: &str) -> Option<CustomerProfile> {
        self.profiles.get(email).cloned()
    }

    fn len(&self) -> usize {
        self.profiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn profile(email: &str, name: &str) -> CustomerProfile {
        CustomerProfile {
            email: email.to_string(),
            name: name.to_string(),
            age: Some(30),
            gender: Some("F".to_string()),
        }
    }

    #[test]
    fn test_load_from_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Customer Email,Customer Name,Customer Age,Customer Gender").unwrap();
        writeln!(file, "ada@example.com,Ada Lovelace,36,F").unwrap();
        writeln!(file, "alan@example.com,Alan Turing,41,M").unwrap();

        let directory = CsvCustomerDirectory::load(file.path()).unwrap();
        assert_eq!(directory.len(), 2);

        let ada = directory.lookup("ada@example.com").unwrap();
        assert_eq!(ada.name, "Ada Lovelace");
        assert_eq!(ada.age, Some(36));
    }

    #[test]
    fn test_duplicate_emails_keep_first() {
        let directory = CsvCustomerDirectory::from_profiles(vec![
            profile("dup@example.com", "First"),
            profile("dup@example.com", "Second"),
        ]);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.lookup("dup@example.com").unwrap().name, "First");
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let directory = CsvCustomerDirectory::empty();
        assert!(directory.lookup("nobody@example.com").is_none());
        assert!(directory.is_empty());
    }

    #[test]
    fn test_missing_age_is_tolerated() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Customer Email,Customer Name,Customer Age,Customer Gender").unwrap();
        writeln!(file, "x@example.com,X,,").unwrap();

        let directory = CsvCustomerDirectory::load(file.path()).unwrap();
        let x = directory.lookup("x@example.com").unwrap();
        assert_eq!(x.age, None);
    }
}
