//! Query windows.

use std::fmt;

use weekboard_core::day::DayKey;

use crate::error::{EngineError, EngineResult};

/// An inclusive `[start, end]` window of calendar days.
///
/// Construction enforces the engine's one precondition: the end may not
/// precede the start. A violated precondition is a caller bug, not a
/// recoverable condition, and never yields a partial result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    start: DayKey,
    end: DayKey,
}

impl DayRange {
    /// Creates a window from inclusive bounds.
    ///
    /// ## Errors
    /// Returns `EngineError::InvalidRange` if `end` is before `start`.
    pub fn new(start: DayKey, end: DayKey) -> EngineResult<Self> {
        if end < start {
            return Err(EngineError::InvalidRange(format!(
                "end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Creates a window of `days` days starting at `anchor`.
    ///
    /// A seven-day window anchored on a Monday ends on the Sunday.
    ///
    /// ## Errors
    /// Returns `EngineError::InvalidRange` if `days` is zero or the end
    /// day overflows the calendar.
    pub fn from_anchor(anchor: DayKey, days: u32) -> EngineResult<Self> {
        if days == 0 {
            return Err(EngineError::InvalidRange(
                "window must span at least one day".to_string(),
            ));
        }
        let end = anchor
            .add_days(u64::from(days) - 1)
            .ok_or_else(|| EngineError::InvalidRange(format!("window end past calendar limit ({anchor} + {days} days)")))?;
        Self::new(anchor, end)
    }

    /// First day of the window (inclusive).
    #[must_use]
    pub const fn start(self) -> DayKey {
        self.start
    }

    /// Last day of the window (inclusive).
    #[must_use]
    pub const fn end(self) -> DayKey {
        self.end
    }

    /// Whether a day falls inside the window, both ends inclusive.
    #[must_use]
    pub fn contains(self, day: DayKey) -> bool {
        self.start <= day && day <= self.end
    }
}

impl fmt::Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
