use serde::{Deserialize, Serialize};

/// Immutable customer reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    #[serde(rename = "Customer Email")]
    pub email: String,
    #[serde(rename = "Customer Name")]
    pub name: String,
    #[serde(rename = "Customer Age")]
    pub age: Option<u32>,
    #[serde(rename = "Customer Gender")]
    pub gender: Option<String>,
}
