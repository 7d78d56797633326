//! Stock data workflows.

use url::Url;

use crate::time::{Clock, SystemClock};
use crate::webhook::{Payload, WebhookRequest, WebhookResponse, WebhookSender};

use super::{Endpoints, stamped};

/// Client for stock quotes, trending lists and overview visit tracking.
#[derive(Debug)]
pub struct StockService<'a, W, C = SystemClock> {
    sender: &'a W,
    clock: C,
    data_url: Url,
    trending_url: Url,
    visit_url: Url,
}

impl<'a, W: WebhookSender> StockService<'a, W, SystemClock> {
    /// Creates the service using the system clock.
    #[must_use]
    pub fn new(sender: &'a W, endpoints: &Endpoints) -> Self {
        Self {
            sender,
            clock: SystemClock,
            data_url: endpoints.stock_data.clone(),
            trending_url: endpoints.trending_stocks.clone(),
            visit_url: endpoints.stocks_visit.clone(),
        }
    }
}

impl<'a, W: WebhookSender, C: Clock> StockService<'a, W, C> {
    /// Replaces the clock used for timestamps.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> StockService<'a, W, C2> {
        StockService {
            sender: self.sender,
            clock,
            data_url: self.data_url,
            trending_url: self.trending_url,
            visit_url: self.visit_url,
        }
    }

    /// Fetches price data for a symbol over a timeframe (e.g. `1D`, `1M`).
    pub async fn stock_data(&self, symbol: &str, timeframe: &str) -> WebhookResponse {
        let payload = Payload::new()
            .with("symbol", symbol)
            .with("timeframe", timeframe);
        self.call(&self.data_url, payload).await
    }

    /// Fetches the trending stocks list.
    pub async fn trending(&self) -> WebhookResponse {
        self.call(&self.trending_url, Payload::new()).await
    }

    /// Reports a visit to the stocks overview.
    pub async fn overview_visit(&self, user_agent: &str) -> WebhookResponse {
        let payload = Payload::new().with("userAgent", user_agent);
        self.call(&self.visit_url, payload).await
    }

    async fn call(&self, url: &Url, payload: Payload) -> WebhookResponse {
        let request = WebhookRequest::get(url.clone(), stamped(payload, &self.clock));
        self.sender.send(request).await
    }
}
