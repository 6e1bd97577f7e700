//! Compact recurrence rules.
//!
//! Rules are `KEY=VALUE` segments joined by `;`, a deliberately small
//! subset of the iCalendar RECUR grammar: three frequencies, an
//! interval, day filters, and an end condition. Anything the board
//! never writes (BYSETPOS, secondly/yearly frequencies, combined
//! BYDAY+BYMONTHDAY semantics) is out of grammar.

mod parse;

pub use parse::parse_rule;

use chrono::Weekday;
use weekboard_core::day::DayKey;

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Parses a FREQ value. Unrecognized values yield `None`, which
    /// invalidates the whole rule.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed, canonicalized recurrence rule.
///
/// Day filters are sorted and de-duplicated so generators can emit
/// candidates in ascending order. Semantic consistency across fields is
/// not validated here: each frequency's generator consults only the
/// fields relevant to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    pub freq: Frequency,
    /// Step between occurrences. Always at least 1.
    pub interval: u32,
    /// Active weekdays (weekly rules). Empty means "anchor's weekday".
    pub by_day: Vec<Weekday>,
    /// Active days of month (monthly rules). Empty means "anchor's
    /// day-of-month". Out-of-range numbers are kept; generation skips
    /// days a month does not have.
    pub by_month_day: Vec<i32>,
    /// Inclusive last day the rule may produce.
    pub until: Option<DayKey>,
    /// Total occurrence budget, counted from the anchor occurrence.
    pub count: Option<u32>,
}
