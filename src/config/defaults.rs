//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Default base URL of the workflow host.
pub const BASE_URL: &str = "https://n8n.bioking.kr";

/// Default per-request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 15;

/// Smallest accepted per-request timeout in seconds.
pub const MIN_TIMEOUT_SECS: u64 = 10;

/// Largest accepted per-request timeout in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 15;

/// Default base delay between retries in milliseconds.
pub const BASE_DELAY_MS: u64 = 1000;

/// Default session id attached to chat, research and report calls.
pub const SESSION_ID: &str = "bioking-cli";

/// Default stock timeframe.
pub const TIMEFRAME: &str = "1D";

/// Default config file name written by `init`.
pub const CONFIG_FILE: &str = "bioking.toml";

/// Endpoint paths, relative to the base URL.
pub mod endpoints {
    /// Chat assistant
    pub const CHAT: &str = "webhook/661d3919-a57f-4c5a-8491-359120f8165b";
    /// Research requests
    pub const RESEARCH: &str = "webhook-test/research";
    /// Report generation
    pub const REPORT: &str = "webhook-test/report";
    /// Per-symbol stock data
    pub const STOCK_DATA: &str = "webhook-test/stocks-data";
    /// Trending stock list
    pub const TRENDING_STOCKS: &str = "webhook-test/trending-stocks";
    /// Stocks overview visits
    pub const STOCKS_VISIT: &str = "webhook-test/stocks-visit";
    /// News feed date selection
    pub const DATE_FILTER: &str = "webhook/7404c6fa-5c6f-49d6-9746-c25c5fc53411";
    /// Article content
    pub const ARTICLE: &str = "webhook/e17e4c67-018a-4265-8bc7-ba8a32059b3b";
    /// Article grades
    pub const GRADE: &str = "webhook/article-grade";
}
