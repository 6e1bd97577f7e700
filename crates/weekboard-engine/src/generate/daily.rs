//! Daily occurrence generation.

use weekboard_core::day::DayKey;

use super::Emitter;
use crate::range::DayRange;
use crate::rule::ParsedRule;

/// Defensive cap on the candidate walk, not a semantic limit.
const ITERATION_CAP: u32 = 10_000;

/// Candidates are `anchor + k * interval` for increasing `k >= 0`.
///
/// When the anchor lies before the window, the walk fast-forwards `k`
/// to the smallest value landing on or after the window start and
/// pre-charges the budget for everything it skipped.
pub(crate) fn generate<F: FnMut(DayKey)>(
    rule: &ParsedRule,
    anchor: DayKey,
    range: DayRange,
    emitter: &mut Emitter<F>,
) {
    let interval = i64::from(rule.interval);
    let mut cursor = anchor;

    if cursor < range.start() {
        let gap = range.start().days_since(cursor);
        let steps = gap / interval;
        let Some(skipped) = cursor.add_days(to_days(steps * interval)) else {
            return;
        };
        cursor = skipped;
        emitter.consume(to_days(steps));
        if cursor < range.start() {
            let Some(next) = cursor.add_days(to_days(interval)) else {
                return;
            };
            cursor = next;
            emitter.consume(1);
        }
    }

    let mut safety = 0;
    while cursor <= range.end() && safety < ITERATION_CAP {
        safety += 1;
        if emitter.offer(cursor).is_break() {
            return;
        }
        let Some(next) = cursor.add_days(to_days(interval)) else {
            return;
        };
        cursor = next;
    }
}

/// Narrows a known-non-negative day count.
fn to_days(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}
