//! The article model and validation of webhook-delivered records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Grade;

/// Reading time assumed when a record has none.
const DEFAULT_READ_TIME: u32 = 5;

/// A news article as shown in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    /// Stable identifier
    pub id: String,
    /// Headline
    pub title: String,
    /// Short summary
    pub summary: String,
    /// Publisher name
    pub source: String,
    /// Publication time as delivered (ISO 8601)
    pub published_at: String,
    /// Link to the original article
    pub url: String,
    /// Optional teaser image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Optional category id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Estimated reading time in minutes
    pub read_time: u32,
    /// Full text, when fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// The user's grade
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
}

impl NewsArticle {
    /// Builds an article from a loosely-typed webhook record.
    ///
    /// Missing or empty fields get defaults: id `news-<index>`, title
    /// `Untitled Article`, source `Unknown Source`, publication time `now`,
    /// url `#`, reading time 5 minutes. Unknown grades are dropped.
    /// Returns `None` if the record is not an object.
    #[must_use]
    pub fn from_value(record: &Value, index: usize, now: DateTime<Utc>) -> Option<Self> {
        let obj = record.as_object()?;
        let text = |key: &str| text_field(obj, key);

        Some(Self {
            id: text("id").unwrap_or_else(|| format!("news-{index}")),
            title: text("title").unwrap_or_else(|| "Untitled Article".to_string()),
            summary: text("summary").unwrap_or_default(),
            source: text("source").unwrap_or_else(|| "Unknown Source".to_string()),
            published_at: text("publishedAt").unwrap_or_else(|| iso(now)),
            url: text("url").unwrap_or_else(|| "#".to_string()),
            image_url: text("imageUrl"),
            category: text("category"),
            read_time: read_time(obj),
            content: text("content"),
            grade: text("grade").and_then(|g| g.parse().ok()),
        })
    }

    /// Builds an article from a fetched article-content record.
    ///
    /// The requested `id` is kept whatever the record says. Missing fields
    /// get defaults: title `Unknown Title`, source `External Source`,
    /// publication time `now`, reading time 5 minutes, empty url. Articles
    /// opened this way are graded `interesting`. Returns `None` if the
    /// record is not an object.
    #[must_use]
    pub fn from_content(record: &Value, id: &str, now: DateTime<Utc>) -> Option<Self> {
        let obj = record.as_object()?;
        let text = |key: &str| text_field(obj, key);

        Some(Self {
            id: id.to_string(),
            title: text("title").unwrap_or_else(|| "Unknown Title".to_string()),
            summary: text("summary").unwrap_or_default(),
            source: text("source").unwrap_or_else(|| "External Source".to_string()),
            published_at: text("publishedAt").unwrap_or_else(|| iso(now)),
            url: text("url").unwrap_or_default(),
            image_url: text("imageUrl"),
            category: text("category"),
            read_time: read_time(obj),
            content: text("content"),
            grade: Some(Grade::Interesting),
        })
    }

    /// Parses `published_at`.
    ///
    /// Accepts RFC 3339 timestamps, offset-less date-times (taken as UTC)
    /// and bare dates (midnight UTC).
    #[must_use]
    pub fn published_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.published_at.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Returns true if the title or summary contains `query`, ignoring case.
    #[must_use]
    pub fn mentions(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.summary.to_lowercase().contains(&query)
    }
}

/// A non-empty string field; numbers are rendered as text.
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `readTime` when it is a positive integer, otherwise the default.
fn read_time(obj: &Map<String, Value>) -> u32 {
    obj.get("readTime")
        .and_then(Value::as_u64)
        .filter(|&minutes| minutes > 0)
        .and_then(|minutes| u32::try_from(minutes).ok())
        .unwrap_or(DEFAULT_READ_TIME)
}

fn iso(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Extracts the `articles` list from a webhook record.
///
/// Non-object entries are skipped. A record without an `articles` array
/// yields an empty list.
#[must_use]
pub fn articles_from_value(record: &Value, now: DateTime<Utc>) -> Vec<NewsArticle> {
    record
        .get("articles")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| NewsArticle::from_value(item, index, now))
                .collect()
        })
        .unwrap_or_default()
}

/// Sets the grade of the article with the given id.
///
/// Returns true if an article matched.
pub fn apply_grade(articles: &mut [NewsArticle], id: &str, grade: Grade) -> bool {
    match articles.iter_mut().find(|a| a.id == id) {
        Some(article) => {
            article.grade = Some(grade);
            true
        }
        None => false,
    }
}
