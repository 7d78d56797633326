//! Article content lookup.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::news::NewsArticle;
use crate::time::{Clock, SystemClock};
use crate::webhook::{Payload, WebhookRequest, WebhookResponse, WebhookSender};

use super::{Endpoints, FetchError, stamped};

/// Which regional feed an article belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// United States feed
    Us,
    /// Korean feed
    Kor,
}

impl Region {
    /// Identifier sent as the `type` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Kor => "kor",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "kor" | "kr" => Ok(Self::Kor),
            _ => Err(format!("Invalid region '{s}': expected us or kor")),
        }
    }
}

/// Client for fetching the full content of a single article.
#[derive(Debug)]
pub struct ArticleService<'a, W, C = SystemClock> {
    sender: &'a W,
    clock: C,
    url: Url,
}

impl<'a, W: WebhookSender> ArticleService<'a, W, SystemClock> {
    /// Creates the service using the system clock.
    #[must_use]
    pub fn new(sender: &'a W, endpoints: &Endpoints) -> Self {
        Self {
            sender,
            clock: SystemClock,
            url: endpoints.article.clone(),
        }
    }
}

impl<'a, W: WebhookSender, C: Clock> ArticleService<'a, W, C> {
    /// Replaces the clock used for timestamps.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ArticleService<'a, W, C2> {
        ArticleService {
            sender: self.sender,
            clock,
            url: self.url,
        }
    }

    /// Fetches an article's content.
    ///
    /// The id is sent as-is and percent-encoded once by the query string.
    pub async fn content(&self, region: Region, article_id: &str) -> WebhookResponse {
        let payload = Payload::new()
            .with("type", region.as_str())
            .with("articleId", article_id);
        let request = WebhookRequest::get(self.url.clone(), stamped(payload, &self.clock));
        self.sender.send(request).await
    }

    /// Fetches an article's content as a [`NewsArticle`].
    ///
    /// The article keeps the requested id and is graded `interesting`;
    /// see [`NewsArticle::from_content`] for the other defaults.
    ///
    /// # Errors
    ///
    /// [`FetchError::Request`] when the call fails, [`FetchError::NoArticle`]
    /// when the response holds no object record.
    pub async fn fetch_article(
        &self,
        region: Region,
        article_id: &str,
    ) -> Result<NewsArticle, FetchError> {
        let response = self.content(region, article_id).await;
        if !response.success {
            return Err(FetchError::Request(response.error.unwrap_or_default()));
        }

        response
            .record()
            .and_then(|record| NewsArticle::from_content(record, article_id, self.clock.utc()))
            .ok_or(FetchError::NoArticle)
    }
}
