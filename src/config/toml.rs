//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Webhook configuration section
    #[serde(default)]
    pub webhook: WebhookSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,

    /// Endpoint path overrides
    #[serde(default)]
    pub endpoints: EndpointsSection,
}

/// Webhook configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Base URL of the workflow host
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout: Option<u64>,

    /// HTTP headers as key-value pairs
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Bearer token for Authorization header
    pub bearer: Option<String>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Base delay between attempts in milliseconds
    pub base_delay_ms: Option<u64>,
}

/// Endpoint section: paths relative to the base URL, or absolute URLs.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointsSection {
    pub chat: Option<String>,
    pub research: Option<String>,
    pub report: Option<String>,
    pub stock_data: Option<String>,
    pub trending_stocks: Option<String>,
    pub stocks_visit: Option<String>,
    pub date_filter: Option<String>,
    pub article: Option<String>,
    pub grade: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# BioKing webhook client configuration

[webhook]
# Base URL that endpoint paths are resolved against
base_url = "https://n8n.bioking.kr"

# Per-request timeout in seconds, between 10 and 15 (default: 15)
# timeout = 15

# HTTP headers added to every request
# [webhook.headers]
# X-Custom-Header = "value"

# Bearer token for Authorization header
# bearer = "your-token-here"

[retry]
# Base delay between attempts in milliseconds (default: 1000)
# Each retry waits base * 1.5^(attempt - 1) * (5 - importance)
# base_delay_ms = 1000

[endpoints]
# Paths are relative to base_url; absolute URLs are used as they are
# chat = "webhook/661d3919-a57f-4c5a-8491-359120f8165b"
# research = "webhook-test/research"
# report = "webhook-test/report"
# stock_data = "webhook-test/stocks-data"
# trending_stocks = "webhook-test/trending-stocks"
# stocks_visit = "webhook-test/stocks-visit"
# date_filter = "webhook/7404c6fa-5c6f-49d6-9746-c25c5fc53411"
# article = "webhook/e17e4c67-018a-4265-8bc7-ba8a32059b3b"
# grade = "webhook/article-grade"
"#
    .to_string()
}
