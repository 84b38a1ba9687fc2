use serde::{Deserialize, Serialize};

/// The fixed category set for support tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueCategory {
    Billing,
    Technical,
    Refund,
    Account,
    Shipping,
    Login,
    #[serde(rename = "Feature Request")]
    FeatureRequest,
    #[serde(rename = "Bug Report")]
    BugReport,
    Complaint,
    Other,
}

/// All categories in prompt order. `Other` last so extraction prefers a
/// specific label when the model mentions several.
const ALL: [IssueCategory; 10] = [
    IssueCategory::Billing,
    IssueCategory::Technical,
    IssueCategory::Refund,
    IssueCategory::Account,
    IssueCategory::Shipping,
    IssueCategory::Login,
    IssueCategory::FeatureRequest,
    IssueCategory::BugReport,
    IssueCategory::Complaint,
    IssueCategory::Other,
];

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Billing => "Billing",
            IssueCategory::Technical => "Technical",
            IssueCategory::Refund => "Refund",
            IssueCategory::Account => "Account",
            IssueCategory::Shipping => "Shipping",
            IssueCategory::Login => "Login",
            IssueCategory::FeatureRequest => "Feature Request",
            IssueCategory::BugReport => "Bug Report",
            IssueCategory::Complaint => "Complaint",
            IssueCategory::Other => "Other",
        }
    }

    /// Extract the first known label mentioned in a model response,
    /// case-insensitively. Anything unrecognizable is `Other`.
    pub fn extract(response: &str) -> IssueCategory {
        let haystack = response.to_lowercase();
        ALL.iter()
            .copied()
            .find(|category| haystack.contains(&category.as_str().to_lowercase()))
            .unwrap_or(IssueCategory::Other)
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
