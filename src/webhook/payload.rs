//! Flat key-value payloads and their wire encodings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key-value payload of a webhook request.
///
/// Keys keep their insertion order, so query strings and JSON bodies list
/// fields in the order callers added them.
///
/// # Example
///
/// ```
/// use bioking_webhook::webhook::Payload;
///
/// let payload = Payload::new().with("a", 1).with("b", "x");
/// let pairs: Vec<_> = payload.query_pairs().collect();
/// assert_eq!(pairs, vec![("a", "1".to_string()), ("b", "x".to_string())]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds a field and returns the payload (builder style).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a field, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if `key` is present (even with a null value).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the payload has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fields rendered for a query string.
    ///
    /// Null values are skipped. Strings are used verbatim, every other value
    /// uses its compact JSON text (`1`, `true`, `["a"]`).
    pub fn query_pairs(&self) -> impl Iterator<Item = (&str, String)> {
        self.iter().filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s.clone())),
            other => Some((key, other.to_string())),
        })
    }

    /// Encodes the payload as a JSON object body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Payload {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut payload = Self::new();
        for (key, value) in iter {
            payload.insert(key, value);
        }
        payload
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_pairs_keep_insertion_order() {
        let payload = Payload::new().with("zeta", "1").with("alpha", "2");
        let keys: Vec<_> = payload.query_pairs().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn query_pairs_skip_null_values() {
        let payload = Payload::new()
            .with("date", Value::Null)
            .with("timestamp", "2024-05-01T00:00:00.000Z");

        let pairs: Vec<_> = payload.query_pairs().collect();
        assert_eq!(
            pairs,
            vec![("timestamp", "2024-05-01T00:00:00.000Z".to_string())]
        );
    }

    #[test]
    fn query_pairs_render_non_strings_as_json_text() {
        let payload = Payload::new()
            .with("n", 2.5)
            .with("flag", false)
            .with("tags", json!(["a", "b"]));

        let pairs: Vec<_> = payload.query_pairs().collect();
        assert_eq!(pairs[0].1, "2.5");
        assert_eq!(pairs[1].1, "false");
        assert_eq!(pairs[2].1, r#"["a","b"]"#);
    }

    #[test]
    fn insert_replaces_existing_key() {
        let mut payload = Payload::new().with("k", 1);
        payload.insert("k", 2);

        assert_eq!(payload.len(), 1);
        assert_eq!(payload.get("k"), Some(&json!(2)));
    }

    #[test]
    fn json_body_includes_nulls() {
        let payload = Payload::new().with("date", Value::Null).with("a", 1);
        let body = payload.to_json_body().unwrap();
        assert_eq!(String::from_utf8(body).unwrap(), r#"{"date":null,"a":1}"#);
    }

    #[test]
    fn collects_from_pairs() {
        let payload: Payload = [("a", "1"), ("b", "2")].into_iter().collect();
        assert!(payload.contains_key("a"));
        assert!(payload.contains_key("b"));
        assert!(!payload.is_empty());
    }
}
