//! The uniform result envelope and response body normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::HttpResponse;

/// Object keys searched, in order, by [`WebhookResponse::text`].
const TEXT_KEYS: [&str; 5] = ["output", "response", "message", "text", "content"];

/// Outcome of a webhook call.
///
/// A successful response carries `data` and no `error`; a failed one carries
/// `error` and no `data`. Absent fields are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Whether the call succeeded
    pub success: bool,
    /// Decoded response body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Message of the last failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WebhookResponse {
    /// Creates a successful response.
    #[must_use]
    pub const fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Creates a failed response.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// The data as a single record.
    ///
    /// Workflows often wrap their output in a one-element array; arrays are
    /// unwrapped to their first element. Returns `None` on failure or for an
    /// empty array.
    #[must_use]
    pub fn record(&self) -> Option<&Value> {
        match self.data.as_ref()? {
            Value::Array(items) => items.first(),
            other => Some(other),
        }
    }

    /// Display text extracted from the data.
    ///
    /// Strings are returned as is. For objects the first string found under
    /// `output`, `response`, `message`, `text` or `content` wins. Anything
    /// else is rendered as compact JSON.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let record = self.record()?;
        if let Value::String(s) = record {
            return Some(s.clone());
        }

        let found = TEXT_KEYS
            .iter()
            .find_map(|key| record.get(key).and_then(Value::as_str));

        Some(found.map_or_else(|| record.to_string(), ToString::to_string))
    }
}

/// Decodes a response body.
///
/// JSON content types are parsed as JSON. Other bodies are read as text and
/// parsed as JSON when possible. Anything that fails to parse is kept as a
/// string.
#[must_use]
pub fn decode_body(response: &HttpResponse) -> Value {
    if response.is_json() {
        if let Ok(value) = serde_json::from_slice(&response.body) {
            return value;
        }
        tracing::debug!("Body declared as JSON did not parse, keeping as text");
        return Value::String(response.body_lossy());
    }

    let text = response.body_lossy();
    serde_json::from_str(&text).unwrap_or_else(|_| {
        tracing::debug!("Response is not JSON, keeping as text");
        Value::String(text)
    })
}
