//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use url::Url;

use crate::services::Endpoints;
use crate::webhook::{ReqwestClient, WebhookClient};

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::{EndpointsSection, TomlConfig};

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Base URL that relative endpoint paths were resolved against
    pub base_url: Url,

    /// Absolute URL of every endpoint
    pub endpoints: Endpoints,

    /// Per-request timeout
    pub timeout: Duration,

    /// Base delay of the retry backoff
    pub base_delay: Duration,

    /// HTTP headers added to every request
    pub headers: HeaderMap,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ base_url: {}, timeout: {}s, base_delay: {}ms, headers: {} }}",
            self.base_url,
            self.timeout.as_secs(),
            self.base_delay.as_millis(),
            self.headers.len(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The base URL or an endpoint is not a valid http(s) URL
    /// - The timeout is outside 10..=15 seconds
    /// - The base delay is zero
    /// - Header format is invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let base_url = Self::resolve_base_url(cli, toml)?;
        let endpoints = resolve_endpoints(&base_url, toml.map(|t| &t.endpoints))?;
        let timeout = Self::resolve_timeout(cli, toml)?;
        let base_delay = Self::resolve_base_delay(cli, toml)?;
        let headers = Self::resolve_headers(cli, toml)?;

        Ok(Self {
            base_url,
            endpoints,
            timeout,
            base_delay,
            headers,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Builds the webhook client described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn build_client(&self) -> Result<WebhookClient<ReqwestClient>, ConfigError> {
        let http = ReqwestClient::with_timeout(self.timeout)?;
        Ok(WebhookClient::new(http)
            .with_headers(self.headers.clone())
            .with_base_delay(self.base_delay))
    }

    /// Resolves a `send` target: an endpoint name, a path relative to the
    /// base URL, or an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be turned into an http(s) URL.
    pub fn resolve_target(&self, target: &str) -> Result<Url, ConfigError> {
        let e = &self.endpoints;
        let named = match target {
            "chat" => Some(&e.chat),
            "research" => Some(&e.research),
            "report" => Some(&e.report),
            "stock_data" | "stock-data" => Some(&e.stock_data),
            "trending_stocks" | "trending" => Some(&e.trending_stocks),
            "stocks_visit" | "visit" => Some(&e.stocks_visit),
            "date_filter" | "date" => Some(&e.date_filter),
            "article" => Some(&e.article),
            "grade" => Some(&e.grade),
            _ => None,
        };

        match named {
            Some(url) => Ok(url.clone()),
            None => join_endpoint(&self.base_url, "target", target),
        }
    }

    fn resolve_base_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let url_str = cli
            .base_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.base_url.as_deref()))
            .unwrap_or(defaults::BASE_URL);

        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason,
        };

        let mut url = Url::parse(url_str).map_err(|e| invalid(e.to_string()))?;
        if !is_http(&url) {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        // A trailing slash makes `join` append to the path instead of replacing its last segment.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let secs = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.webhook.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if !(defaults::MIN_TIMEOUT_SECS..=defaults::MAX_TIMEOUT_SECS).contains(&secs) {
            return Err(ConfigError::InvalidTimeout {
                secs,
                min: defaults::MIN_TIMEOUT_SECS,
                max: defaults::MAX_TIMEOUT_SECS,
            });
        }

        Ok(Duration::from_secs(secs))
    }

    fn resolve_base_delay(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let millis = cli
            .base_delay_ms
            .or_else(|| toml.and_then(|t| t.retry.base_delay_ms))
            .unwrap_or(defaults::BASE_DELAY_MS);

        if millis == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "base_delay_ms",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_millis(millis))
    }

    fn resolve_headers(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();

        // Add TOML headers first (CLI can override)
        if let Some(toml) = toml {
            for (name, value) in &toml.webhook.headers {
                let header_name = parse_header_name(name)?;
                let header_value = parse_header_value(name, value)?;
                headers.insert(header_name, header_value);
            }
        }

        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            let header_name = parse_header_name(&name)?;
            let header_value = parse_header_value(&name, &value)?;
            headers.insert(header_name, header_value);
        }

        // Handle bearer token (CLI wins, then TOML)
        let bearer = cli
            .bearer
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.bearer.as_deref()));

        if let Some(token) = bearer {
            let auth_value = format!("Bearer {token}");
            let header_value = parse_header_value("Authorization", &auth_value)?;
            headers.insert(AUTHORIZATION, header_value);
        }

        Ok(headers)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn resolve_endpoints(
    base: &Url,
    section: Option<&EndpointsSection>,
) -> Result<Endpoints, ConfigError> {
    let endpoint = |name: &str, configured: Option<&String>, default: &str| {
        let value = configured.map_or(default, String::as_str);
        join_endpoint(base, name, value)
    };
    let s = section;

    Ok(Endpoints {
        chat: endpoint(
            "chat",
            s.and_then(|s| s.chat.as_ref()),
            defaults::endpoints::CHAT,
        )?,
        research: endpoint(
            "research",
            s.and_then(|s| s.research.as_ref()),
            defaults::endpoints::RESEARCH,
        )?,
        report: endpoint(
            "report",
            s.and_then(|s| s.report.as_ref()),
            defaults::endpoints::REPORT,
        )?,
        stock_data: endpoint(
            "stock_data",
            s.and_then(|s| s.stock_data.as_ref()),
            defaults::endpoints::STOCK_DATA,
        )?,
        trending_stocks: endpoint(
            "trending_stocks",
            s.and_then(|s| s.trending_stocks.as_ref()),
            defaults::endpoints::TRENDING_STOCKS,
        )?,
        stocks_visit: endpoint(
            "stocks_visit",
            s.and_then(|s| s.stocks_visit.as_ref()),
            defaults::endpoints::STOCKS_VISIT,
        )?,
        date_filter: endpoint(
            "date_filter",
            s.and_then(|s| s.date_filter.as_ref()),
            defaults::endpoints::DATE_FILTER,
        )?,
        article: endpoint(
            "article",
            s.and_then(|s| s.article.as_ref()),
            defaults::endpoints::ARTICLE,
        )?,
        grade: endpoint(
            "grade",
            s.and_then(|s| s.grade.as_ref()),
            defaults::endpoints::GRADE,
        )?,
    })
}

/// Resolves `value` against `base`; absolute URLs replace the base entirely.
fn join_endpoint(base: &Url, name: &str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        name: name.to_string(),
        value: value.to_string(),
        reason,
    };

    let url = base.join(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !is_http(&url) {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(url)
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // "Key=Value" or "Key: Value"; the first separator ends the name
    let Some(at) = s.find(['=', ':']) else {
        return Err(ConfigError::InvalidHeader {
            value: s.to_string(),
        });
    };

    let (name, value) = (&s[..at], &s[at + 1..]);
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
