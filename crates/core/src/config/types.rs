use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration.
///
/// Loaded once at process start and handed to each component constructor.
/// Every external-client section is optional: a missing section puts that
/// client into its degraded (sentinel/fallback) mode instead of failing
/// startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub llm: Option<LlmConfig>,
    #[serde(default)]
    pub tracker: Option<TrackerConfig>,
    #[serde(default)]
    pub notifier: Option<NotifierConfig>,
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("supportflow.db")
}

/// Customer directory configuration.
///
/// The directory is read-only reference data loaded from a CSV export of the
/// CRM. No path means an empty directory (every lookup misses).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DirectoryConfig {
    pub customers_csv: Option<PathBuf>,
}

/// Batch driver configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BatchConfig {
    /// CSV of candidate customer queries to sample from.
    pub queries_csv: Option<PathBuf>,
}

/// Chat-completions endpoint configuration (classification and drafting).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// API base URL, e.g. "https://api.deepseek.com".
    pub api_base: String,
    /// Model identifier.
    pub model: String,
    /// Bearer token.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.deepseek.com".to_string(),
            model: "deepseek-chat".to_string(),
            api_key: None,
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_llm_timeout() -> u32 {
    20
}

/// Issue tracker (Jira-style REST) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerConfig {
    pub base_url: Option<String>,
    pub account_email: Option<String>,
    pub api_token: Option<String>,
    #[serde(default = "default_project_key")]
    pub project_key: String,
    #[serde(default = "default_tracker_timeout")]
    pub timeout_secs: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            account_email: None,
            api_token: None,
            project_key: default_project_key(),
            timeout_secs: default_tracker_timeout(),
        }
    }
}

fn default_project_key() -> String {
    "CUS".to_string()
}

fn default_tracker_timeout() -> u32 {
    10
}

/// Team-channel webhook configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
    pub webhook_url: Option<String>,
    #[serde(default = "default_notifier_timeout")]
    pub timeout_secs: u32,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_notifier_timeout(),
        }
    }
}

fn default_notifier_timeout() -> u32 {
    5
}

/// Outbound mail (SMTP submission) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    /// From-address for every outbound message.
    pub from: String,
}

fn default_smtp_port() -> u16 {
    587
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub directory: DirectoryConfig,
    pub batch: BatchConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<SanitizedLlmConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<SanitizedTrackerConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifier: Option<SanitizedNotifierConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<SanitizedEmailConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLlmConfig {
    pub api_base: String,
    pub model: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTrackerConfig {
    pub base_url: Option<String>,
    pub account_email: Option<String>,
    pub api_token_configured: bool,
    pub project_key: String,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedNotifierConfig {
    pub webhook_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedEmailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub from: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            directory: config.directory.clone(),
            batch: config.batch.clone(),
            llm: config.llm.as_ref().map(|l| SanitizedLlmConfig {
                api_base: l.api_base.clone(),
                model: l.model.clone(),
                api_key_configured: l.api_key.as_deref().is_some_and(|k| !k.is_empty()),
                timeout_secs: l.timeout_secs,
            }),
            tracker: config.tracker.as_ref().map(|t| SanitizedTrackerConfig {
                base_url: t.base_url.clone(),
                account_email: t.account_email.clone(),
                api_token_configured: t.api_token.as_deref().is_some_and(|k| !k.is_empty()),
                project_key: t.project_key.clone(),
                timeout_secs: t.timeout_secs,
            }),
            notifier: config.notifier.as_ref().map(|n| SanitizedNotifierConfig {
                webhook_configured: n.webhook_url.as_deref().is_some_and(|u| !u.is_empty()),
                timeout_secs: n.timeout_secs,
            }),
            email: config.email.as_ref().map(|e| SanitizedEmailConfig {
                host: e.host.clone(),
                port: e.port,
                username: e.username.clone(),
                from: e.from.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path, PathBuf::from("supportflow.db"));
        assert!(config.llm.is_none());
        assert!(config.tracker.is_none());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
path = "tickets.db"

[directory]
customers_csv = "data/crm.csv"

[batch]
queries_csv = "data/customer_query.csv"

[llm]
api_base = "https://api.deepseek.com"
model = "deepseek-chat"
api_key = "sk-test"

[tracker]
base_url = "https://example.atlassian.net"
account_email = "bot@example.com"
api_token = "tok"
project_key = "SUP"

[notifier]
webhook_url = "https://hooks.example.com/T000/B000/xyz"

[email]
host = "smtp.example.com"
username = "mailer"
password = "secret"
from = "support@example.com"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.as_ref().unwrap().model, "deepseek-chat");
        assert_eq!(config.llm.as_ref().unwrap().timeout_secs, 20);
        assert_eq!(config.tracker.as_ref().unwrap().project_key, "SUP");
        assert_eq!(config.notifier.as_ref().unwrap().timeout_secs, 5);
        assert_eq!(config.email.as_ref().unwrap().port, 587);
    }

    #[test]
    fn test_tracker_project_key_defaults() {
        let toml = r#"
[tracker]
base_url = "https://example.atlassian.net"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.tracker.as_ref().unwrap().project_key, "CUS");
    }

    #[test]
    fn test_sanitized_config_redacts_secrets() {
        let toml = r#"
[llm]
api_base = "https://api.deepseek.com"
model = "deepseek-chat"
api_key = "sk-secret"

[email]
host = "smtp.example.com"
username = "mailer"
password = "hunter2"
from = "support@example.com"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(!json.contains("hunter2"));
        assert!(json.contains("\"api_key_configured\":true"));
    }
}
