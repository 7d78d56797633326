//! News feed date selection.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use url::Url;

use crate::news::{NewsArticle, articles_from_value};
use crate::time::{Clock, SystemClock};
use crate::webhook::{Payload, WebhookRequest, WebhookResponse, WebhookSender};

use super::{Endpoints, FetchError, stamped};

/// Client for the workflow that serves the news feed for a selected day.
#[derive(Debug)]
pub struct DateFilterService<'a, W, C = SystemClock> {
    sender: &'a W,
    clock: C,
    url: Url,
}

impl<'a, W: WebhookSender> DateFilterService<'a, W, SystemClock> {
    /// Creates the service using the system clock.
    #[must_use]
    pub fn new(sender: &'a W, endpoints: &Endpoints) -> Self {
        Self {
            sender,
            clock: SystemClock,
            url: endpoints.date_filter.clone(),
        }
    }
}

impl<'a, W: WebhookSender, C: Clock> DateFilterService<'a, W, C> {
    /// Replaces the clock used for timestamps and article defaults.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> DateFilterService<'a, W, C2> {
        DateFilterService {
            sender: self.sender,
            clock,
            url: self.url,
        }
    }

    /// Sends the selected date, or a cleared selection.
    pub async fn send_date(&self, date: Option<DateTime<Utc>>) -> WebhookResponse {
        let date = date.map_or(Value::Null, |d| {
            Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true))
        });
        let payload = stamped(Payload::new().with("date", date), &self.clock);
        self.sender
            .send(WebhookRequest::get(self.url.clone(), payload))
            .await
    }

    /// Sends the selected date and returns the articles the workflow answers with.
    ///
    /// A successful response without an `articles` list yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Request`] with the response's message when the call fails.
    pub async fn fetch_articles(
        &self,
        date: DateTime<Utc>,
    ) -> Result<Vec<NewsArticle>, FetchError> {
        let response = self.send_date(Some(date)).await;
        if !response.success {
            return Err(FetchError::Request(response.error.unwrap_or_default()));
        }

        let articles = response
            .record()
            .map(|record| articles_from_value(record, self.clock.utc()))
            .unwrap_or_default();

        tracing::debug!("Loaded {} articles from webhook", articles.len());
        Ok(articles)
    }
}
