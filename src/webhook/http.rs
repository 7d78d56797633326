//! Library-neutral HTTP types and the client seam used by the retry loop.

use std::future::Future;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use url::Url;

use super::HttpError;

/// One outgoing HTTP call, fully encoded.
///
/// Built once per webhook call and cloned for every attempt, so all
/// attempts share the same URL (and cache-buster).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// GET or POST
    pub method: Method,
    /// Absolute URL with the encoded query string
    pub url: Url,
    /// Headers sent with the call
    pub headers: HeaderMap,
    /// JSON body for POST calls
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a bodiless request without headers.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    #[must_use]
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// Attaches a body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header; an existing value under the same name is dropped.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status line code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// True for any 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The `Content-Type` header value, if it is visible ASCII.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// True if the server declared `application/json` (with or without parameters).
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.contains("application/json"))
    }

    /// The body as UTF-8 with invalid sequences replaced.
    #[must_use]
    pub fn body_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends a single HTTP request.
///
/// [`WebhookClient`](super::WebhookClient) is generic over this trait, so
/// tests drive the retry loop with scripted clients instead of a network.
pub trait HttpClient: Send + Sync {
    /// Performs the call.
    ///
    /// Non-2xx statuses come back as `Ok`; the caller decides what they mean.
    ///
    /// # Errors
    ///
    /// [`HttpError::Connection`] or [`HttpError::Timeout`] for transport
    /// failures, [`HttpError::InvalidUrl`] if the request cannot be built.
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}
