//! Hour-ignorant minute/second clock arithmetic.
//!
//! A wave always starts on the hour and is over roughly twenty minutes
//! later, so death-time estimates only ever need minutes and seconds past
//! the hour. [`WbsTime`] pretends hours do not exist.
//!
//! # Limitations
//!
//! Minutes are not reduced modulo 60. A world beamed at `:55` dies at
//! `65:00`, which compares as later than every wall-clock reading, and
//! [`WbsTime::time_until`] never wraps into the next hour. Both are
//! acceptable because waves never straddle the top of the hour.

use std::fmt;

use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Number of seconds in one minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Minutes and seconds past the hour.
///
/// Always normalized: `seconds` is in `0..60` and overflow carries into
/// `minutes`. Ordering is lexicographic on `(minutes, seconds)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WbsTime {
    minutes: u32,
    seconds: u32,
}

impl WbsTime {
    /// `0:00`.
    pub const ZERO: Self = Self {
        minutes: 0,
        seconds: 0,
    };

    /// Build a time from minutes and seconds, carrying excess seconds into
    /// minutes. `WbsTime::new(0, 130)` is `2:10`.
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self::from_seconds(
            minutes
                .saturating_mul(SECONDS_PER_MINUTE)
                .saturating_add(seconds),
        )
    }

    /// Build a time from a raw number of seconds.
    pub fn from_seconds(total: u32) -> Self {
        Self {
            minutes: total.checked_div(SECONDS_PER_MINUTE).unwrap_or(0),
            seconds: total.checked_rem(SECONDS_PER_MINUTE).unwrap_or(0),
        }
    }

    /// The minute and second of the current UTC wall clock.
    pub fn current() -> Self {
        Self::from_datetime(&Utc::now())
    }

    /// The minute and second of `instant`, discarding everything else.
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::new(instant.minute(), instant.second())
    }

    /// Whole minutes.
    pub const fn minutes(self) -> u32 {
        self.minutes
    }

    /// Seconds past the minute, always below 60.
    pub const fn seconds(self) -> u32 {
        self.seconds
    }

    /// Total number of seconds represented.
    pub const fn total_seconds(self) -> u32 {
        self.minutes
            .saturating_mul(SECONDS_PER_MINUTE)
            .saturating_add(self.seconds)
    }

    /// Sum of two times.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn add(self, other: Self) -> Self {
        Self::from_seconds(self.total_seconds().saturating_add(other.total_seconds()))
    }

    /// This time shifted forward by whole minutes.
    #[must_use]
    pub fn add_minutes(self, minutes: u32) -> Self {
        Self::new(self.minutes.saturating_add(minutes), self.seconds)
    }

    /// Duration from `self` until `target`.
    ///
    /// Clamped to `0:00` when `target` is not strictly after `self`; it does
    /// not wrap around to the next hour.
    #[must_use]
    pub fn time_until(self, target: Self) -> Self {
        Self::from_seconds(target.total_seconds().saturating_sub(self.total_seconds()))
    }
}

impl fmt::Display for WbsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}
