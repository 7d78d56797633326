//! Request importance levels and the retry profile they imply.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Priority tag attached to a webhook request.
///
/// Lower numbers are more important and get both more attempts and shorter
/// waits between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Importance {
    /// Level 1: user-facing calls such as chat messages.
    Critical = 1,
    /// Level 2: research requests.
    Important = 2,
    /// Level 3: the default.
    Standard = 3,
    /// Level 4: background or nice-to-have calls.
    Low = 4,
}

/// Retry ceiling and backoff factor for one importance level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryProfile {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,
    /// Multiplier applied to every backoff delay.
    pub backoff_factor: f64,
}

/// Attempt ceiling and backoff factor for a request.
///
/// | importance  | attempts | factor |
/// |-------------|----------|--------|
/// | critical    | 5        | 4      |
/// | important   | 4        | 3      |
/// | standard    | 3        | 2      |
/// | low         | 2        | 1      |
/// | unspecified | 3        | 1      |
#[must_use]
pub const fn retry_profile(importance: Option<Importance>) -> RetryProfile {
    let max_attempts = match importance {
        Some(Importance::Critical) => 5,
        Some(Importance::Important) => 4,
        Some(Importance::Standard) | None => 3,
        Some(Importance::Low) => 2,
    };

    let backoff_factor = match importance {
        Some(level) => (5 - level.level()) as f64,
        None => 1.0,
    };

    RetryProfile {
        max_attempts,
        backoff_factor,
    }
}

impl Importance {
    /// All levels, most important first.
    pub const ALL: [Self; 4] = [Self::Critical, Self::Important, Self::Standard, Self::Low];

    /// Numeric level (1 = critical .. 4 = low).
    #[must_use]
    pub const fn level(self) -> u8 {
        self as u8
    }

    /// Looks up a level by number.
    #[must_use]
    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Critical),
            2 => Some(Self::Important),
            3 => Some(Self::Standard),
            4 => Some(Self::Low),
            _ => None,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Standard => "standard",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Importance> for u8 {
    fn from(value: Importance) -> Self {
        value.level()
    }
}

/// Error returned for an importance outside 1..=4 or an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid importance '{0}': expected 1-4 or critical, important, standard, low")]
pub struct InvalidImportance(pub String);

impl TryFrom<u8> for Importance {
    type Error = InvalidImportance;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_level(value).ok_or_else(|| InvalidImportance(value.to_string()))
    }
}

impl FromStr for Importance {
    type Err = InvalidImportance;

    /// Accepts either the number or the name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(level) = trimmed.parse::<u8>() {
            return Self::try_from(level).map_err(|_| InvalidImportance(s.to_string()));
        }

        match trimmed.to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "important" => Ok(Self::Important),
            "standard" => Ok(Self::Standard),
            "low" => Ok(Self::Low),
            _ => Err(InvalidImportance(s.to_string())),
        }
    }
}
