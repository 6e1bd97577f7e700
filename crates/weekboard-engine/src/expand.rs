//! The expansion pipeline.
//!
//! Combines three categories into one ordered list: non-recurring items
//! already inside the window, occurrences generated from recurring
//! masters, and materialized overrides. A master whose rule does not
//! parse is excluded from expansion without failing the call; logging
//! that is the caller's business.

use std::collections::{HashMap, HashSet};

use weekboard_core::day::DayKey;
use weekboard_core::item::Item;

use crate::entry::{Entry, EntryId};
use crate::generate::{self, Emitter, Limits};
use crate::range::DayRange;
use crate::resolve::{OverrideIndex, resolve};
use crate::rule::parse_rule;

/// Expands a working set of items over a window.
///
/// The caller (normally the storage layer) supplies every row that could
/// contribute: in-window plain items, masters whose rules might produce
/// inside the window even when anchored before it, and all overrides of
/// those masters. Output is de-duplicated by identity and sorted by day,
/// then timed entries before untimed ones, then start time, then
/// stringified identity.
///
/// Expansion is deterministic and stateless: identical inputs yield the
/// identical ordered output.
#[must_use]
pub fn expand(items: &[Item], range: DayRange) -> Vec<Entry> {
    tracing::trace!(items = items.len(), %range, "expanding window");

    let mut entries: Vec<Entry> = items
        .iter()
        .filter(|item| {
            item.recurrence.is_none() && item.parent_id.is_none() && range.contains(item.day)
        })
        .map(Entry::plain)
        .collect();

    let overrides: OverrideIndex<'_> = items
        .iter()
        .filter_map(|item| {
            let parent = item.parent_id?;
            let day = item.occurrence_day?;
            Some(((parent, day), item))
        })
        .collect();

    for master in items.iter().filter(|item| item.is_master()) {
        let Some(recurrence) = master.recurrence.as_ref() else {
            continue;
        };
        let Some(rule) = parse_rule(&recurrence.rule) else {
            // Unparseable rule: the master is left out of expansion.
            continue;
        };
        let exdates: HashSet<DayKey> = recurrence.exdates.iter().copied().collect();
        let limits = Limits::effective(&rule, recurrence);

        let mut emitter = Emitter::new(range, limits, |day: DayKey| {
            if let Some(entry) = resolve(day, master, &exdates, &overrides) {
                entries.push(entry);
            }
        });
        generate::run(&rule, master.day, range, &mut emitter);
    }

    // First occurrence of an identity wins; by construction no identity
    // should appear twice.
    let mut seen: HashSet<EntryId> = HashSet::with_capacity(entries.len());
    entries.retain(|entry| seen.insert(entry.id));

    entries.sort_by_cached_key(|entry| {
        (
            entry.day,
            entry.time_start.is_none(),
            entry.time_start,
            entry.id.to_string(),
        )
    });
    entries
}
