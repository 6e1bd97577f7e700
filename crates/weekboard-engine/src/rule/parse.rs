//! Recurrence rule string parsing.
//!
//! Parsing is forgiving by design: a malformed field is dropped and the
//! rest of the rule still applies. Only a missing or unrecognized FREQ
//! invalidates the whole rule, in which case the item behaves as
//! non-recurring.

use chrono::{NaiveDate, Weekday};
use weekboard_core::day::DayKey;

use super::{Frequency, ParsedRule};

/// Parses a compact recurrence rule.
///
/// `KEY=VALUE` segments separated by `;`, case-insensitive keys.
/// Unknown keys and segments without `=` are ignored. Returns `None`
/// when FREQ is missing or unrecognized.
#[must_use]
pub fn parse_rule(input: &str) -> Option<ParsedRule> {
    let mut freq = None;
    let mut interval = 1u32;
    let mut by_day: Vec<Weekday> = Vec::new();
    let mut by_month_day: Vec<i32> = Vec::new();
    let mut until = None;
    let mut count = None;

    for segment in input.split(';') {
        let Some((raw_key, raw_value)) = segment.split_once('=') else {
            continue;
        };
        let value = raw_value.trim();
        match raw_key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => {
                if let Some(parsed) = Frequency::parse(value) {
                    freq = Some(parsed);
                }
            }
            "INTERVAL" => {
                // Non-numeric or < 1 clamps to 1.
                interval = value.parse::<u32>().ok().filter(|i| *i >= 1).unwrap_or(1);
            }
            "BYDAY" => by_day = parse_weekday_list(value),
            "BYMONTHDAY" => by_month_day = parse_month_day_list(value),
            "UNTIL" => until = parse_until(value),
            "COUNT" => count = value.parse::<u32>().ok(),
            _ => {} // Unknown rule part - ignore
        }
    }

    let freq = freq?;

    // Canonicalize day filters so generators walk candidates in
    // ascending order.
    by_day.sort_by_key(|d| d.num_days_from_monday());
    by_day.dedup();
    by_month_day.sort_unstable();
    by_month_day.dedup();

    Some(ParsedRule {
        freq,
        interval,
        by_day,
        by_month_day,
        until,
        count,
    })
}

/// Parses a BYDAY list. Unknown codes are dropped; an empty result is
/// treated as an absent filter.
fn parse_weekday_list(value: &str) -> Vec<Weekday> {
    value.split(',').filter_map(parse_weekday_code).collect()
}

/// Parses a two-letter weekday code.
fn parse_weekday_code(code: &str) -> Option<Weekday> {
    match code.trim().to_ascii_uppercase().as_str() {
        "SU" => Some(Weekday::Sun),
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        _ => None,
    }
}

/// Parses a BYMONTHDAY list. Non-numeric entries are dropped.
fn parse_month_day_list(value: &str) -> Vec<i32> {
    value
        .split(',')
        .filter_map(|v| v.trim().parse::<i32>().ok())
        .collect()
}

/// Parses an UNTIL value as `YYYYMMDD` or `YYYY-MM-DD`.
///
/// The day is inclusive. An unparseable value is ignored (no until).
fn parse_until(value: &str) -> Option<DayKey> {
    let trimmed = value.trim();
    if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(trimmed, "%Y%m%d")
            .ok()
            .map(DayKey::from);
    }
    trimmed.parse::<DayKey>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rule_daily_basic() {
        let rule = parse_rule("FREQ=DAILY;INTERVAL=2").unwrap();
        assert_eq!(rule.freq, Frequency::Daily);
        assert_eq!(rule.interval, 2);
        assert!(rule.by_day.is_empty());
        assert!(rule.until.is_none());
        assert!(rule.count.is_none());
    }

    #[test]
    fn parse_rule_defaults_interval_to_one() {
        assert_eq!(parse_rule("FREQ=DAILY").unwrap().interval, 1);
        assert_eq!(parse_rule("FREQ=DAILY;INTERVAL=abc").unwrap().interval, 1);
        assert_eq!(parse_rule("FREQ=DAILY;INTERVAL=0").unwrap().interval, 1);
        assert_eq!(parse_rule("FREQ=DAILY;INTERVAL=-3").unwrap().interval, 1);
    }

    #[test]
    fn parse_rule_requires_known_freq() {
        assert!(parse_rule("").is_none());
        assert!(parse_rule("INTERVAL=2").is_none());
        assert!(parse_rule("FREQ=HOURLY").is_none());
        assert!(parse_rule("FREQ=daily").is_none());
    }

    #[test]
    fn parse_rule_keys_are_case_insensitive() {
        let rule = parse_rule("freq=WEEKLY;byday=MO,we").unwrap();
        assert_eq!(rule.freq, Frequency::Weekly);
        assert_eq!(rule.by_day, vec![Weekday::Mon, Weekday::Wed]);
    }

    #[test]
    fn parse_rule_drops_unknown_weekday_codes() {
        let rule = parse_rule("FREQ=WEEKLY;BYDAY=MO,XX,FR").unwrap();
        assert_eq!(rule.by_day, vec![Weekday::Mon, Weekday::Fri]);
        // Empty after filtering behaves as absent.
        assert!(parse_rule("FREQ=WEEKLY;BYDAY=XX,YY").unwrap().by_day.is_empty());
    }

    #[test]
    fn parse_rule_sorts_and_dedups_day_filters() {
        let rule = parse_rule("FREQ=WEEKLY;BYDAY=FR,MO,FR").unwrap();
        assert_eq!(rule.by_day, vec![Weekday::Mon, Weekday::Fri]);

        let rule = parse_rule("FREQ=MONTHLY;BYMONTHDAY=15,1,15").unwrap();
        assert_eq!(rule.by_month_day, vec![1, 15]);
    }

    #[test]
    fn parse_rule_month_day_list_drops_non_numeric() {
        let rule = parse_rule("FREQ=MONTHLY;BYMONTHDAY=1,abc,31").unwrap();
        assert_eq!(rule.by_month_day, vec![1, 31]);
    }

    #[test]
    fn parse_rule_until_both_formats() {
        let compact = parse_rule("FREQ=DAILY;UNTIL=20240315").unwrap();
        let dashed = parse_rule("FREQ=DAILY;UNTIL=2024-03-15").unwrap();
        assert_eq!(compact.until, dashed.until);
        assert_eq!(compact.until.unwrap().to_string(), "2024-03-15");
    }

    #[test]
    fn parse_rule_ignores_invalid_until_and_count() {
        let rule = parse_rule("FREQ=DAILY;UNTIL=soon;COUNT=many").unwrap();
        assert!(rule.until.is_none());
        assert!(rule.count.is_none());
    }

    #[test]
    fn parse_rule_ignores_unknown_keys() {
        let rule = parse_rule("FREQ=DAILY;WKST=MO;X-CUSTOM=1").unwrap();
        assert_eq!(rule.freq, Frequency::Daily);
    }

    #[test]
    fn parse_rule_count() {
        assert_eq!(parse_rule("FREQ=DAILY;COUNT=10").unwrap().count, Some(10));
    }
}
