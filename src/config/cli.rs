//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::news::{Grade, GradeSelection};
use crate::services::Region;
use crate::webhook::{Importance, WebhookMethod};

use super::defaults;

/// `BioKing` webhook client
///
/// Calls the `BioKing` automation workflows with importance-scaled retries
/// and prints the response envelope as JSON.
#[derive(Debug, Parser)]
#[command(name = "bioking")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Base URL that endpoint paths are resolved against
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds (10-15)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Base delay between retries in milliseconds
    #[arg(long = "base-delay-ms", global = true)]
    pub base_delay_ms: Option<u64>,

    /// HTTP headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V", global = true)]
    pub headers: Vec<String>,

    /// Bearer token for Authorization header
    #[arg(long, global = true)]
    pub bearer: Option<String>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for bioking
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Send an arbitrary payload to an endpoint
    Send {
        /// Endpoint name (e.g. `chat`), path relative to the base URL, or absolute URL
        endpoint: String,

        /// Payload field; values are read as JSON when possible (can be specified multiple times)
        #[arg(long = "field", short = 'f', value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, Value)>,

        /// HTTP method
        #[arg(long, short, default_value = "GET")]
        method: WebhookMethod,

        /// Importance 1-4 or its name; omit for the default retry profile
        #[arg(long, short)]
        importance: Option<Importance>,
    },

    /// Send a chat message
    Chat {
        /// Message text
        message: String,

        /// Conversation session id
        #[arg(long, default_value = defaults::SESSION_ID)]
        session: String,
    },

    /// Start a research query
    Research {
        /// Research query
        query: String,

        /// Conversation session id
        #[arg(long, default_value = defaults::SESSION_ID)]
        session: String,
    },

    /// Request a report on a topic
    Report {
        /// Report topic
        topic: String,

        /// Conversation session id
        #[arg(long, default_value = defaults::SESSION_ID)]
        session: String,
    },

    /// Fetch price data for a stock symbol
    Stock {
        /// Ticker symbol
        symbol: String,

        /// Timeframe (e.g. 1D, 1W, 1M)
        #[arg(long, short, default_value = defaults::TIMEFRAME)]
        timeframe: String,
    },

    /// Fetch the trending stocks list
    Trending,

    /// Report a visit to the stocks overview
    Visit {
        /// User agent to report
        #[arg(long = "user-agent", default_value = concat!("bioking/", env!("CARGO_PKG_VERSION")))]
        user_agent: String,
    },

    /// Select the news feed date (omit to clear the selection)
    Date {
        /// Date as YYYY-MM-DD or an RFC 3339 timestamp
        #[arg(value_parser = parse_datetime)]
        date: Option<DateTime<Utc>>,
    },

    /// Fetch the content of an article
    Article {
        /// Regional feed: us or kor
        region: Region,

        /// Article id
        id: String,
    },

    /// Grade an article
    Grade {
        /// Article id
        id: String,

        /// Grade: critical, important, useful, or interesting
        grade: Grade,
    },

    /// Fetch the news feed for a day and filter it locally
    News {
        /// Day to fetch (YYYY-MM-DD, default: today in UTC)
        #[arg(long, short)]
        date: Option<NaiveDate>,

        /// Grade to keep, or `all`
        #[arg(long, short, default_value = "all")]
        grade: GradeSelection,

        /// Case-insensitive search in titles and summaries
        #[arg(long, short)]
        query: Option<String>,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}

/// Parses a `KEY=VALUE` payload field.
///
/// The value is taken as JSON if it parses (numbers, booleans, `null`,
/// quoted strings), otherwise as a plain string.
///
/// # Errors
///
/// Returns an error if there is no `=` or the key is empty.
pub fn parse_field(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid field '{s}': expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Invalid field '{s}': empty key"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Parses a date as an RFC 3339 timestamp or a bare `YYYY-MM-DD` day (midnight UTC).
///
/// # Errors
///
/// Returns an error if neither form matches.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("Invalid date '{s}': expected YYYY-MM-DD or RFC 3339"))
}
