//! Candidate date generation, one algorithm per frequency.
//!
//! Each generator walks its candidate days in ascending order and feeds
//! them through an [`Emitter`], which applies the occurrence budget
//! protocol shared by all frequencies:
//!
//! 1. a candidate past the UNTIL day stops generation;
//! 2. the candidate consumes one unit of the produced budget, whether or
//!    not it lands inside the window;
//! 3. a candidate beyond the COUNT budget stops generation;
//! 4. only then is the in-window filter applied.
//!
//! The budget is counted from the master's own anchor occurrence, so
//! generators that fast-forward past days before the window pre-charge
//! the budget for everything they skipped.
//!
//! Every generator also carries a safety bound on its loop. Hitting a
//! bound silently truncates generation; it protects against pathological
//! rule/window combinations and is not an error.

mod daily;
mod monthly;
mod weekly;

use std::ops::ControlFlow;

use weekboard_core::day::DayKey;
use weekboard_core::item::Recurrence;

use crate::range::DayRange;
use crate::rule::{Frequency, ParsedRule};

/// Effective end conditions for one master: rule-level values win,
/// master-level values apply when the rule has none.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Limits {
    pub until: Option<DayKey>,
    pub count: Option<u64>,
}

impl Limits {
    pub(crate) fn effective(rule: &ParsedRule, recurrence: &Recurrence) -> Self {
        Self {
            until: rule.until.or(recurrence.until_day),
            count: rule.count.or(recurrence.count).map(u64::from),
        }
    }
}

/// Budget-tracking sink between a generator and its consumer.
pub(crate) struct Emitter<F: FnMut(DayKey)> {
    range: DayRange,
    limits: Limits,
    produced: u64,
    sink: F,
}

impl<F: FnMut(DayKey)> Emitter<F> {
    pub(crate) fn new(range: DayRange, limits: Limits, sink: F) -> Self {
        Self {
            range,
            limits,
            produced: 0,
            sink,
        }
    }

    /// Pre-charges the budget for occurrences skipped before the window.
    pub(crate) fn consume(&mut self, occurrences: u64) {
        self.produced = self.produced.saturating_add(occurrences);
    }

    /// Offers one candidate day, in ascending order.
    ///
    /// Returns `Break` once generation must stop: the candidate passed
    /// the UNTIL day, or the COUNT budget is spent. Both checks run
    /// before the in-window filter, so out-of-window candidates consume
    /// budget too.
    pub(crate) fn offer(&mut self, day: DayKey) -> ControlFlow<()> {
        if let Some(until) = self.limits.until {
            if day > until {
                return ControlFlow::Break(());
            }
        }
        self.produced += 1;
        if let Some(count) = self.limits.count {
            if self.produced > count {
                return ControlFlow::Break(());
            }
        }
        if self.range.contains(day) {
            (self.sink)(day);
        }
        ControlFlow::Continue(())
    }
}

/// Runs the generator matching the rule's frequency.
pub(crate) fn run<F: FnMut(DayKey)>(
    rule: &ParsedRule,
    anchor: DayKey,
    range: DayRange,
    emitter: &mut Emitter<F>,
) {
    match rule.freq {
        Frequency::Daily => daily::generate(rule, anchor, range, emitter),
        Frequency::Weekly => weekly::generate(rule, anchor, range, emitter),
        Frequency::Monthly => monthly::generate(rule, anchor, range, emitter),
    }
}
