//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait for reading the current time and a
//! [`Sleeper`] trait for waiting between retry attempts. Production code uses
//! [`SystemClock`] and [`TokioSleeper`]; tests inject fixed clocks and
//! [`InstantSleeper`] so retries run without real delays.

use std::time::{Duration, SystemTime};

use chrono::{DateTime, SecondsFormat, Utc};

/// Abstraction over system time for testability.
///
/// # Example
///
/// ```
/// use bioking_webhook::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now >= std::time::SystemTime::UNIX_EPOCH);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;

    /// Milliseconds since the Unix epoch, used for cache-busting parameters.
    ///
    /// Pre-epoch times report 0.
    fn epoch_millis(&self) -> u128 {
        self.now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis())
    }

    /// The current time as an RFC 3339 string with millisecond precision
    /// and a `Z` suffix (e.g. `2024-05-01T09:30:00.000Z`).
    fn iso_timestamp(&self) -> String {
        self.utc().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// The current time as a UTC datetime.
    fn utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.now())
    }
}

/// Production clock using actual system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock frozen at a single instant.
///
/// Handy for deterministic payloads (the `_t` parameter and `timestamp`
/// fields) in tests and dry runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub SystemTime);

impl FixedClock {
    /// Creates a clock frozen at the given number of milliseconds after the epoch.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(SystemTime::UNIX_EPOCH + Duration::from_millis(millis))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

/// Abstraction over async sleeping so retry delays can be skipped in tests.
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
