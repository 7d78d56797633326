//! Webhook requests and their translation into HTTP requests.

use std::fmt;
use std::str::FromStr;

use http::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, HeaderValue};
use url::Url;

use super::{AttemptError, HttpRequest, Importance, Payload};

/// Name of the cache-busting query parameter added to GET requests.
pub const CACHE_BUSTER_PARAM: &str = "_t";

/// Payload key carrying the numeric importance level.
pub const IMPORTANCE_KEY: &str = "importance";

/// HTTP method used for a webhook call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebhookMethod {
    /// Payload travels in the query string.
    #[default]
    Get,
    /// Payload travels as a JSON body.
    Post,
}

impl From<WebhookMethod> for http::Method {
    fn from(method: WebhookMethod) -> Self {
        match method {
            WebhookMethod::Get => Self::GET,
            WebhookMethod::Post => Self::POST,
        }
    }
}

impl fmt::Display for WebhookMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

impl FromStr for WebhookMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(format!("Invalid method '{s}': expected GET or POST")),
        }
    }
}

/// A single webhook call: where, what, how, and how hard to try.
///
/// # Example
///
/// ```
/// use bioking_webhook::webhook::{Importance, Payload, WebhookRequest};
/// use url::Url;
///
/// let url = Url::parse("https://n8n.example.com/webhook/chat").unwrap();
/// let request = WebhookRequest::get(url, Payload::new().with("message", "hi"))
///     .with_importance(Importance::Critical);
/// assert_eq!(request.importance, Some(Importance::Critical));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookRequest {
    /// Absolute endpoint URL
    pub url: Url,
    /// Key-value payload
    pub payload: Payload,
    /// GET or POST
    pub method: WebhookMethod,
    /// Importance tag; `None` means standard retry ceiling with no backoff scaling
    pub importance: Option<Importance>,
}

impl WebhookRequest {
    /// Creates a request with the given method.
    #[must_use]
    pub const fn new(method: WebhookMethod, url: Url, payload: Payload) -> Self {
        Self {
            url,
            payload,
            method,
            importance: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub const fn get(url: Url, payload: Payload) -> Self {
        Self::new(WebhookMethod::Get, url, payload)
    }

    /// Creates a POST request.
    #[must_use]
    pub const fn post(url: Url, payload: Payload) -> Self {
        Self::new(WebhookMethod::Post, url, payload)
    }

    /// Tags the request with an importance level.
    #[must_use]
    pub const fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Payload as sent on the wire.
    ///
    /// When an importance is set and the caller did not supply an
    /// `importance` field, the numeric level is appended.
    #[must_use]
    pub fn wire_payload(&self) -> Payload {
        let mut payload = self.payload.clone();
        if let Some(importance) = self.importance {
            if !payload.contains_key(IMPORTANCE_KEY) {
                payload.insert(IMPORTANCE_KEY, importance.level());
            }
        }
        payload
    }

    /// Builds the HTTP request.
    ///
    /// GET requests carry the payload plus `_t=<cache_buster>` in the query
    /// string. POST requests carry the payload as a JSON body. Both ask for
    /// JSON and disable caching.
    ///
    /// # Errors
    ///
    /// Returns [`AttemptError::Encode`] if the payload cannot be serialized.
    pub fn to_http(&self, cache_buster: u128) -> Result<HttpRequest, AttemptError> {
        let payload = self.wire_payload();

        let request = match self.method {
            WebhookMethod::Get => {
                let mut url = self.url.clone();
                {
                    let mut query = url.query_pairs_mut();
                    for (key, value) in payload.query_pairs() {
                        query.append_pair(key, &value);
                    }
                    query.append_pair(CACHE_BUSTER_PARAM, &cache_buster.to_string());
                }
                HttpRequest::get(url)
            }
            WebhookMethod::Post => HttpRequest::post(self.url.clone())
                .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .with_body(payload.to_json_body()?),
        };

        Ok(request
            .with_header(ACCEPT, HeaderValue::from_static("application/json"))
            .with_header(CACHE_CONTROL, HeaderValue::from_static("no-store")))
    }
}
