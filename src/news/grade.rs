//! Importance grades users attach to articles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::webhook::Importance;

/// A user's assessment of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    /// Must read.
    Critical,
    /// Worth reading soon.
    Important,
    /// Useful background.
    Useful,
    /// Interesting, no urgency.
    Interesting,
}

impl Grade {
    /// All grades, most important first.
    pub const ALL: [Self; 4] = [
        Self::Critical,
        Self::Important,
        Self::Useful,
        Self::Interesting,
    ];

    /// Lowercase identifier used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Useful => "useful",
            Self::Interesting => "interesting",
        }
    }

    /// Request importance of the same rank.
    #[must_use]
    pub const fn importance(self) -> Importance {
        match self {
            Self::Critical => Importance::Critical,
            Self::Important => Importance::Important,
            Self::Useful => Importance::Standard,
            Self::Interesting => Importance::Low,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown grade name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid grade '{0}': expected critical, important, useful, or interesting")]
pub struct InvalidGrade(pub String);

impl FromStr for Grade {
    type Err = InvalidGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == lower)
            .ok_or_else(|| InvalidGrade(s.to_string()))
    }
}

/// Grade criterion of the article filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradeSelection {
    /// Every article, graded or not.
    #[default]
    All,
    /// Only articles carrying exactly this grade.
    Only(Grade),
}

impl GradeSelection {
    /// Returns true if an article with the given grade passes.
    #[must_use]
    pub fn matches(self, grade: Option<Grade>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => grade == Some(wanted),
        }
    }
}

impl FromStr for GradeSelection {
    type Err = InvalidGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}
