//! Calendar day keys.
//!
//! Every day value crossing the engine boundary is a civil calendar day
//! with no time component. `DayKey` wraps a `chrono::NaiveDate` and
//! always renders as zero-padded `YYYY-MM-DD`, so the derived ordering
//! agrees with lexicographic ordering of the rendered form.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Day-key rendering format (ISO calendar date).
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day in the board's civil timezone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Creates a day key from calendar components.
    ///
    /// Returns `None` if the components do not name a real calendar day
    /// (month out of range, day-of-month that does not exist in the
    /// month, etc.).
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Returns the underlying calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Number of whole calendar days from `other` to `self`.
    ///
    /// Positive when `self` is later than `other`.
    #[must_use]
    pub fn days_since(self, other: Self) -> i64 {
        self.0.signed_duration_since(other.0).num_days()
    }

    /// The day `days` calendar days after this one.
    ///
    /// Returns `None` on calendar overflow.
    #[must_use]
    pub fn add_days(self, days: u64) -> Option<Self> {
        self.0.checked_add_days(chrono::Days::new(days)).map(Self)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DAY_KEY_FORMAT)
            .map(Self)
            .map_err(|_e| CoreError::ParseError(format!("invalid day key: {s}")))
    }
}
