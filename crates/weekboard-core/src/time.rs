//! Times of day.
//!
//! Board items carry optional start/end times with minute precision.
//! Absence is always an explicit `None`, never an empty string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A 24-hour wall-clock time, minute precision.
///
/// Renders as zero-padded `HH:mm`. The derived ordering agrees with
/// lexicographic ordering of the rendered form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Creates a time of day.
    ///
    /// Returns `None` if `hour` or `minute` is out of range.
    #[must_use]
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }

    /// Hour component (0-23).
    #[must_use]
    pub const fn hour(self) -> u8 {
        self.hour
    }

    /// Minute component (0-59).
    #[must_use]
    pub const fn minute(self) -> u8 {
        self.minute
    }

    /// Normalizes a user-entered time string.
    ///
    /// Accepts `HH:mm`, `HH:mm:ss` (seconds truncated), and `h:mm am/pm`
    /// (converted to 24-hour). Returns `None` for anything else,
    /// including empty input.
    #[must_use]
    pub fn normalize(value: &str) -> Option<Self> {
        let raw = value.trim();
        if raw.is_empty() {
            return None;
        }

        // HH:mm:ss - keep hours and minutes, drop seconds
        let mut parts = raw.splitn(3, ':');
        let hour_str = parts.next()?;
        let minute_str = parts.next()?;
        if let Some(second_str) = parts.next() {
            if second_str.len() != 2 || !second_str.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            return Self::from_parts(hour_str, minute_str, None);
        }

        // h:mm with optional trailing meridiem
        let (minute_str, meridiem) = split_meridiem(minute_str);
        Self::from_parts(hour_str, minute_str, meridiem)
    }

    fn from_parts(hour_str: &str, minute_str: &str, meridiem: Option<Meridiem>) -> Option<Self> {
        if hour_str.is_empty() || hour_str.len() > 2 || minute_str.len() != 2 {
            return None;
        }
        let mut hour = hour_str.parse::<u8>().ok()?;
        let minute = minute_str.parse::<u8>().ok()?;

        match meridiem {
            Some(Meridiem::Am) if hour == 12 => hour = 0,
            Some(Meridiem::Pm) if hour != 12 => hour = hour.checked_add(12)?,
            _ => {}
        }

        Self::new(hour, minute)
    }
}

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Splits a trailing `am`/`pm` marker (any case, optional leading space)
/// off a minute field.
fn split_meridiem(s: &str) -> (&str, Option<Meridiem>) {
    let trimmed = s.trim_end();
    let (rest, meridiem) = if let Some(rest) = strip_suffix_ci(trimmed, "am") {
        (rest, Some(Meridiem::Am))
    } else if let Some(rest) = strip_suffix_ci(trimmed, "pm") {
        (rest, Some(Meridiem::Pm))
    } else {
        (trimmed, None)
    };
    (rest.trim_end(), meridiem)
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let (head, tail) = s.split_at_checked(s.len().checked_sub(suffix.len())?)?;
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s).ok_or_else(|| CoreError::ParseError(format!("invalid time: {s}")))
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_plain_24h() {
        assert_eq!(TimeOfDay::normalize("09:30").unwrap().to_string(), "09:30");
        assert_eq!(TimeOfDay::normalize("23:59").unwrap().to_string(), "23:59");
    }

    #[test]
    fn normalize_truncates_seconds() {
        assert_eq!(
            TimeOfDay::normalize("14:05:59").unwrap().to_string(),
            "14:05"
        );
    }

    #[test]
    fn normalize_single_digit_hour() {
        assert_eq!(TimeOfDay::normalize("9:30").unwrap().to_string(), "09:30");
    }

    #[test]
    fn normalize_meridiem() {
        assert_eq!(TimeOfDay::normalize("9:30 pm").unwrap().to_string(), "21:30");
        assert_eq!(TimeOfDay::normalize("9:30am").unwrap().to_string(), "09:30");
        assert_eq!(TimeOfDay::normalize("12:00 am").unwrap().to_string(), "00:00");
        assert_eq!(TimeOfDay::normalize("12:15 PM").unwrap().to_string(), "12:15");
    }

    #[test]
    fn normalize_rejects_junk() {
        assert!(TimeOfDay::normalize("").is_none());
        assert!(TimeOfDay::normalize("25:00").is_none());
        assert!(TimeOfDay::normalize("10:75").is_none());
        assert!(TimeOfDay::normalize("noon").is_none());
        assert!(TimeOfDay::normalize("10:5").is_none());
    }

    #[test]
    fn ordering_matches_lexicographic() {
        let a = TimeOfDay::normalize("09:00").unwrap();
        let b = TimeOfDay::normalize("10:30").unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }
}
