//! Client-side filtering of the article list.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use super::{GradeSelection, NewsArticle};

/// Date, grade and free-text criteria applied to an in-memory article list.
///
/// All criteria must hold for an article to pass. The default filter keeps
/// everything.
///
/// # Example
///
/// ```
/// use bioking_webhook::news::{ArticleFilter, Grade, GradeSelection};
///
/// let filter = ArticleFilter::new()
///     .with_grade(GradeSelection::Only(Grade::Critical))
///     .with_query("fda");
/// assert!(filter.date.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    /// Calendar day (UTC) the article must be published on
    pub date: Option<NaiveDate>,
    /// Grade criterion
    pub grade: GradeSelection,
    /// Case-insensitive text searched in title and summary
    pub query: Option<String>,
}

impl ArticleFilter {
    /// Creates a filter that keeps every article.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to articles published on `date`.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Restricts by grade.
    #[must_use]
    pub const fn with_grade(mut self, grade: GradeSelection) -> Self {
        self.grade = grade;
        self
    }

    /// Restricts to articles mentioning `query`. An empty query is ignored.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = (!query.is_empty()).then_some(query);
        self
    }

    /// Returns true if the article passes every criterion.
    #[must_use]
    pub fn matches(&self, article: &NewsArticle) -> bool {
        self.date_matches(article)
            && self.grade.matches(article.grade)
            && self.query.as_deref().is_none_or(|q| article.mentions(q))
    }

    /// Articles that pass, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, articles: &'a [NewsArticle]) -> Vec<&'a NewsArticle> {
        articles.iter().filter(|a| self.matches(a)).collect()
    }

    fn date_matches(&self, article: &NewsArticle) -> bool {
        let Some(date) = self.date else {
            return true;
        };
        let Some(published) = article.published_at_utc() else {
            return false;
        };

        let (start, end) = day_bounds(date);
        published >= start && published <= end
    }
}

/// First and last representable instant of a UTC calendar day.
///
/// The last representable day ends at `DateTime::<Utc>::MAX_UTC`.
fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = start
        .checked_add_signed(TimeDelta::days(1))
        .map_or(DateTime::<Utc>::MAX_UTC, |next| next - TimeDelta::nanoseconds(1));
    (start, end)
}
