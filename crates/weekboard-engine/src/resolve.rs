//! Exception and override resolution.
//!
//! For any master and candidate day, exactly one of three things
//! happens: the override for that day wins, a bare exception suppresses
//! the day, or a plain occurrence is generated from the master's
//! template. An override beats an exception on the same day; creating an
//! override also records the exception, so a generated occurrence and an
//! override can never coexist.

use std::collections::{HashMap, HashSet};

use weekboard_core::day::DayKey;
use weekboard_core::item::Item;

use crate::entry::Entry;

/// Overrides indexed by `(master identity, occurrence day)`.
pub type OverrideIndex<'a> = HashMap<(i64, DayKey), &'a Item>;

/// Decides what a candidate day becomes for one master.
///
/// Returns `None` when the day is suppressed by a bare exception.
#[must_use]
#[expect(
    clippy::implicit_hasher,
    reason = "Callers always pass std maps built by the expansion pipeline"
)]
pub fn resolve(
    day: DayKey,
    master: &Item,
    exdates: &HashSet<DayKey>,
    overrides: &OverrideIndex<'_>,
) -> Option<Entry> {
    if let Some(override_row) = overrides.get(&(master.id, day)) {
        return Some(Entry::overridden(override_row, master.id, day));
    }
    if exdates.contains(&day) {
        return None;
    }
    Some(Entry::generated(master, day))
}
