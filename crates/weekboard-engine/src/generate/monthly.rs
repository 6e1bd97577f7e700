//! Monthly occurrence generation.

use chrono::{Datelike, Months, NaiveDate};
use weekboard_core::day::DayKey;

use super::Emitter;
use crate::range::DayRange;
use crate::rule::ParsedRule;

/// Defensive cap on the month walk, not a semantic limit.
const MONTH_CAP: u32 = 600;

/// The active day-of-month set is BYMONTHDAY when present, else the
/// anchor's own day-of-month. Months fire when their distance from the
/// anchor's month is a multiple of the interval.
///
/// A day number a month does not have (31 in April, 30 in February) is
/// skipped outright: no candidate is constructed and no budget is
/// consumed for it.
pub(crate) fn generate<F: FnMut(DayKey)>(
    rule: &ParsedRule,
    anchor: DayKey,
    range: DayRange,
    emitter: &mut Emitter<F>,
) {
    let day_numbers: Vec<i32> = if rule.by_month_day.is_empty() {
        vec![i32::try_from(anchor.date().day()).unwrap_or_default()]
    } else {
        rule.by_month_day.clone()
    };
    let interval = i64::from(rule.interval);

    let Some(anchor_month) = first_of_month(anchor.date()) else {
        return;
    };
    let mut month = anchor_month;

    if anchor < range.start() {
        let gap = months_between(anchor_month, range.start().date());
        let steps = gap / interval;
        let Some(skipped) = add_months(month, steps * interval) else {
            return;
        };
        month = skipped;
        emitter.consume(
            u64::try_from(steps).unwrap_or_default() * day_numbers.len() as u64,
        );
    }

    let mut safety = 0;
    while DayKey::from(month) <= range.end() && safety < MONTH_CAP {
        safety += 1;
        for number in &day_numbers {
            let Ok(day_of_month) = u32::try_from(*number) else {
                continue;
            };
            let Some(date) = NaiveDate::from_ymd_opt(month.year(), month.month(), day_of_month)
            else {
                continue; // no such day in this month
            };
            let candidate = DayKey::from(date);
            if candidate < anchor {
                continue;
            }
            if emitter.offer(candidate).is_break() {
                return;
            }
        }
        let Some(next) = add_months(month, interval) else {
            return;
        };
        month = next;
    }
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

/// Whole calendar months from `from` (a first-of-month) to `to`.
fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let years = i64::from(to.year()) - i64::from(from.year());
    let months = i64::from(to.month()) - i64::from(from.month());
    years * 12 + months
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(u32::try_from(months).ok()?))
}
