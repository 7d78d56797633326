//! Error types for HTTP operations and individual webhook attempts.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    ///
    /// This indicates a configuration error rather than a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failure of a single webhook attempt.
///
/// The message of this error becomes the `error` field of the final
/// [`WebhookResponse`](super::WebhookResponse) when all attempts are used up.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The HTTP exchange did not complete.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The server answered with a status outside the 2xx range.
    #[error("Server responded with status: {} - {}", status.as_u16(), body.as_deref().unwrap_or(""))]
    NonSuccessStatus {
        /// HTTP status code returned by the server
        status: http::StatusCode,
        /// Response body, if it was valid UTF-8
        body: Option<String>,
    },

    /// The payload could not be serialized.
    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Terminal failure of a webhook call.
///
/// Never escapes [`WebhookSender::send`](super::WebhookSender::send); it is
/// folded into a failed [`WebhookResponse`](super::WebhookResponse).
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Every attempt failed with a retryable error.
    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// Number of attempts made
        attempts: u32,
        /// Error from the final attempt
        #[source]
        last_error: AttemptError,
    },

    /// An attempt failed in a way retrying cannot fix.
    #[error(transparent)]
    Permanent(#[from] AttemptError),
}

impl WebhookError {
    /// Message of the last underlying failure, as reported to callers.
    #[must_use]
    pub fn last_message(&self) -> String {
        match self {
            Self::MaxRetriesExceeded { last_error, .. } => last_error.to_string(),
            Self::Permanent(e) => e.to_string(),
        }
    }
}
