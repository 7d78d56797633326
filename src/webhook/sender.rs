//! Webhook sender trait and the retrying HTTP implementation.

use std::time::Duration;

use serde_json::Value;

use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};

use super::response::decode_body;
use super::{
    AttemptError, HttpClient, HttpError, HttpRequest, Importance, RetryPolicy, WebhookError,
    WebhookRequest, WebhookResponse,
};

/// Trait for issuing webhook calls.
///
/// Implementations never fail: every outcome is reported through
/// [`WebhookResponse::success`]. Services take any sender by reference, so
/// tests can substitute a recording mock.
pub trait WebhookSender: Send + Sync {
    /// Sends a request and returns the result envelope.
    fn send(
        &self,
        request: WebhookRequest,
    ) -> impl std::future::Future<Output = WebhookResponse> + Send;
}

/// HTTP webhook client with importance-scaled retries.
///
/// Each call builds one HTTP request (a single `_t` cache-buster for all of
/// its attempts) and tries it up to the importance-derived ceiling, sleeping
/// with exponential backoff between failures. No state is kept between
/// calls, so one client can serve any number of concurrent calls.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper for retry delays (defaults to [`TokioSleeper`])
/// - `C`: The clock for cache-busting (defaults to [`SystemClock`])
///
/// # Example
///
/// ```no_run
/// use bioking_webhook::webhook::{
///     Payload, ReqwestClient, WebhookClient, WebhookRequest, WebhookSender,
/// };
/// use url::Url;
///
/// # async fn example() {
/// let client = WebhookClient::new(ReqwestClient::new());
/// let url = Url::parse("https://n8n.example.com/webhook/trending").unwrap();
/// let response = client.send(WebhookRequest::get(url, Payload::new())).await;
/// if !response.success {
///     eprintln!("{}", response.error.unwrap_or_default());
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct WebhookClient<H, S = TokioSleeper, C = SystemClock> {
    http: H,
    sleeper: S,
    clock: C,
    headers: http::HeaderMap,
    base_delay: Duration,
}

impl<H> WebhookClient<H, TokioSleeper, SystemClock> {
    /// Creates a client with real sleeps, the system clock, no extra
    /// headers and a 1 second base delay.
    #[must_use]
    pub fn new(http: H) -> Self {
        Self {
            http,
            sleeper: TokioSleeper,
            clock: SystemClock,
            headers: http::HeaderMap::new(),
            base_delay: RetryPolicy::DEFAULT_BASE_DELAY,
        }
    }
}

impl<H, S, C> WebhookClient<H, S, C> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> WebhookClient<H, S2, C> {
        WebhookClient {
            http: self.http,
            sleeper,
            clock: self.clock,
            headers: self.headers,
            base_delay: self.base_delay,
        }
    }

    /// Sets a custom clock for the cache-busting parameter.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> WebhookClient<H, S, C2> {
        WebhookClient {
            http: self.http,
            sleeper: self.sleeper,
            clock,
            headers: self.headers,
            base_delay: self.base_delay,
        }
    }

    /// Sets headers added to every request (e.g. authorization).
    #[must_use]
    pub fn with_headers(mut self, headers: http::HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the base backoff delay.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Returns the base backoff delay.
    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Returns the extra headers sent with every request.
    #[must_use]
    pub const fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Returns the clock used for cache-busting.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Retry policy applied to a request of the given importance.
    #[must_use]
    pub const fn retry_policy(&self, importance: Option<Importance>) -> RetryPolicy {
        RetryPolicy::for_importance(importance).with_base_delay(self.base_delay)
    }
}

impl<H: HttpClient, S: Sleeper, C: Clock> WebhookClient<H, S, C> {
    /// Builds the HTTP request, adding the configured headers.
    fn build_request(&self, request: &WebhookRequest) -> Result<HttpRequest, AttemptError> {
        let mut http_request = request.to_http(self.clock.epoch_millis())?;

        for (name, value) in &self.headers {
            http_request.headers.insert(name, value.clone());
        }

        Ok(http_request)
    }

    /// Executes a single attempt and decodes the body on success.
    async fn execute_attempt(&self, request: &HttpRequest) -> Result<Value, AttemptError> {
        let response = self.http.request(request.clone()).await?;

        if !response.is_success() {
            return Err(AttemptError::NonSuccessStatus {
                status: response.status,
                body: Some(response.body_lossy()),
            });
        }

        Ok(decode_body(&response))
    }

    /// Runs the bounded retry loop.
    async fn send_with_retry(&self, request: &WebhookRequest) -> Result<Value, WebhookError> {
        let policy = self.retry_policy(request.importance);
        let http_request = self.build_request(request)?;

        tracing::debug!(
            "Sending {} to {} (importance: {}, max attempts: {})",
            request.method,
            request.url,
            request
                .importance
                .map_or_else(|| "default".to_string(), |i| i.to_string()),
            policy.max_attempts,
        );

        let mut last_error: Option<AttemptError> = None;

        for attempt in 1..=policy.max_attempts {
            tracing::debug!("Attempt {attempt} to fetch from {}", http_request.url);

            match self.execute_attempt(&http_request).await {
                Ok(data) => return Ok(data),
                Err(e) => {
                    if !e.is_retryable() {
                        return Err(e.into());
                    }

                    if policy.should_retry(attempt) {
                        let delay = policy.delay_after_attempt(attempt);
                        tracing::warn!(
                            "Attempt {attempt} failed: {e}; retrying in {}ms (backoff factor: {})",
                            delay.as_millis(),
                            policy.backoff_factor,
                        );
                        self.sleeper.sleep(delay).await;
                    }

                    last_error = Some(e);
                }
            }
        }

        Err(WebhookError::MaxRetriesExceeded {
            attempts: policy.max_attempts,
            last_error: last_error.expect("max_attempts >= 1 ensures at least one attempt"),
        })
    }
}

impl<H: HttpClient, S: Sleeper, C: Clock> WebhookSender for WebhookClient<H, S, C> {
    async fn send(&self, request: WebhookRequest) -> WebhookResponse {
        match self.send_with_retry(&request).await {
            Ok(data) => WebhookResponse::ok(data),
            Err(e) => {
                tracing::error!("Error in webhook request to {}: {e}", request.url);
                WebhookResponse::failure(e.last_message())
            }
        }
    }
}

/// Extension trait for checking if an error is retryable.
///
/// Transport failures and non-2xx statuses are transient; an unusable URL
/// or an unencodable payload is not.
pub trait IsRetryable {
    /// Returns true if the error is potentially transient and should be retried.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout => true,
            Self::InvalidUrl(_) => false,
        }
    }
}

impl IsRetryable for AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_retryable(),
            Self::NonSuccessStatus { .. } => true,
            Self::Encode(_) => false,
        }
    }
}
