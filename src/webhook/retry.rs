//! Retry policy for webhook requests.

use std::time::Duration;

use super::importance::{Importance, retry_profile};

/// Exponential backoff settings for one webhook call.
///
/// The delay before retry `n` (after attempt `n` failed, 1-indexed) is
/// `base_delay × growth^(n-1) × backoff_factor`.
///
/// # Example
///
/// ```
/// use bioking_webhook::webhook::{Importance, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::for_importance(Some(Importance::Critical));
/// assert_eq!(policy.max_attempts, 5);
/// assert_eq!(policy.delay_after_attempt(1), Duration::from_secs(4));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    ///
    /// A value of 1 means no retries; only the initial attempt is made.
    pub max_attempts: u32,

    /// Delay unit before the first retry, before the backoff factor is applied.
    pub base_delay: Duration,

    /// Growth applied per additional retry.
    pub growth: f64,

    /// Multiplier derived from importance (`5 - level`, or 1 when unspecified).
    pub backoff_factor: f64,
}

impl RetryPolicy {
    /// Default base delay (1 second).
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

    /// Default per-retry growth.
    pub const DEFAULT_GROWTH: f64 = 1.5;

    /// Creates the policy for an importance level with the default base delay.
    #[must_use]
    pub const fn for_importance(importance: Option<Importance>) -> Self {
        let profile = retry_profile(importance);
        Self {
            max_attempts: profile.max_attempts,
            base_delay: Self::DEFAULT_BASE_DELAY,
            growth: Self::DEFAULT_GROWTH,
            backoff_factor: profile.backoff_factor,
        }
    }

    /// Sets the base delay.
    ///
    /// Zero delay is supported (useful for testing) but creates a tight
    /// retry loop in production.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Computes the delay to wait after the given failed attempt (1-indexed).
    ///
    /// Attempt 0 is treated as attempt 1.
    #[must_use]
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.base_delay.as_secs_f64() * self.growth.powi(exponent) * self.backoff_factor;
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Returns true if another attempt may follow the given attempt (1-indexed).
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::for_importance(None)
    }
}
