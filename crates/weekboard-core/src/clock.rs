//! Clock capability.
//!
//! "Today" is always derived from an injected clock plus the board's
//! configured timezone. The recurrence engine itself never consults a
//! clock; only callers that need a default day (e.g. item creation with
//! no day given) do.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::day::DayKey;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar day in the given timezone.
    fn today(&self, tz: Tz) -> DayKey {
        DayKey::from(self.now().with_timezone(&tz).date_naive())
    }
}

/// Wall clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
