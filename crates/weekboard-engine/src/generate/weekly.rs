//! Weekly occurrence generation.

use chrono::{Datelike, Weekday};
use weekboard_core::day::DayKey;

use super::Emitter;
use crate::range::DayRange;
use crate::rule::ParsedRule;

/// Defensive cap on the week walk, not a semantic limit.
const WEEK_CAP: u32 = 2_000;

/// Candidates are computed per ISO week (weeks start Monday). The
/// active weekday set is BYDAY when present, else the anchor's own
/// weekday. Weeks fire when their distance from the anchor's week is a
/// multiple of the interval.
///
/// The budget for occurrences before the window is estimated as
/// `floor(weeksBeforeWindow / interval) * |weekdaySet|`. For windows
/// starting mid-week this can be off by a fraction of one week's set
/// relative to a strict walk from the anchor; the cheap estimate is the
/// accepted trade-off.
pub(crate) fn generate<F: FnMut(DayKey)>(
    rule: &ParsedRule,
    anchor: DayKey,
    range: DayRange,
    emitter: &mut Emitter<F>,
) {
    let weekdays: Vec<Weekday> = if rule.by_day.is_empty() {
        vec![anchor.date().weekday()]
    } else {
        rule.by_day.clone()
    };
    let interval = i64::from(rule.interval);
    let anchor_week = week_start(anchor);
    let start_week = week_start(anchor.max(range.start()));

    let weeks_before = start_week.days_since(anchor_week) / 7;
    emitter.consume(
        u64::try_from(weeks_before / interval).unwrap_or_default()
            * weekdays.len() as u64,
    );

    let mut week = start_week;
    let mut safety = 0;
    while week <= range.end() && safety < WEEK_CAP {
        safety += 1;
        let weeks_from_anchor = week.days_since(anchor_week) / 7;
        if weeks_from_anchor % interval == 0 {
            for weekday in &weekdays {
                let Some(candidate) =
                    week.add_days(u64::from(weekday.num_days_from_monday()))
                else {
                    return;
                };
                if candidate < anchor {
                    continue;
                }
                if emitter.offer(candidate).is_break() {
                    return;
                }
            }
        }
        let Some(next) = week.add_days(7) else {
            return;
        };
        week = next;
    }
}

/// Monday of the day's ISO week.
fn week_start(day: DayKey) -> DayKey {
    let back = u64::from(day.date().weekday().num_days_from_monday());
    DayKey::from(day.date() - chrono::Days::new(back))
}
