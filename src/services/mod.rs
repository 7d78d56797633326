//! Typed wrappers around the individual workflow endpoints.
//!
//! Each service borrows a [`WebhookSender`](crate::webhook::WebhookSender)
//! and owns the URLs it talks to, so one configured client can be shared by
//! every service. Payloads carry an ISO-8601 `timestamp` from the service's
//! [`Clock`].

mod article;
mod chat;
mod date_filter;
mod error;
mod grade;
mod stock;


use url::Url;

use crate::time::Clock;
use crate::webhook::Payload;

pub use article::{ArticleService, Region};
pub use chat::ChatService;
pub use date_filter::DateFilterService;
pub use error::FetchError;
pub use grade::GradeService;
pub use stock::StockService;

/// Payload key for the request timestamp.
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Absolute URLs of every workflow endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Chat assistant
    pub chat: Url,
    /// Research requests
    pub research: Url,
    /// Report generation
    pub report: Url,
    /// Per-symbol stock data
    pub stock_data: Url,
    /// Trending stock list
    pub trending_stocks: Url,
    /// Stocks overview visit tracking
    pub stocks_visit: Url,
    /// News feed date selection
    pub date_filter: Url,
    /// Article content lookup
    pub article: Url,
    /// Article grade submission
    pub grade: Url,
}

/// Appends the current time under `timestamp`.
fn stamped(payload: Payload, clock: &impl Clock) -> Payload {
    payload.with(TIMESTAMP_KEY, clock.iso_timestamp())
}
