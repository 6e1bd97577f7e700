//! Board item model.
//!
//! A persisted item is one of three shapes:
//! - a plain item: no recurrence, no parent;
//! - a master: carries a [`Recurrence`] and no parent; its own
//!   day/time/title act as the template for generated occurrences;
//! - an override: references a parent master and carries the occurrence
//!   day it replaces.

use serde::{Deserialize, Serialize};

use crate::day::DayKey;
use crate::error::{CoreError, CoreResult};
use crate::time::TimeOfDay;

/// Upper bound on item titles, matching the stored column width.
pub const TITLE_MAX_LEN: usize = 255;

/// What kind of schedulable unit an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Event,
    Task,
}

impl ItemKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Task => "task",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress state, carried by tasks only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Done,
    Canceled,
}

impl TaskStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Done => "done",
            Self::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurrence fields, present only on master items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    /// Compact rule string (`FREQ=...;INTERVAL=...;...`).
    pub rule: String,
    /// Inclusive last day the rule may produce, master-level fallback.
    #[serde(default)]
    pub until_day: Option<DayKey>,
    /// Total occurrence budget, master-level fallback.
    #[serde(default)]
    pub count: Option<u32>,
    /// Days explicitly skipped. Unordered, duplicate-free.
    #[serde(default)]
    pub exdates: Vec<DayKey>,
}

impl Recurrence {
    /// Creates a recurrence from just a rule string.
    #[must_use]
    pub fn from_rule(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            until_day: None,
            count: None,
            exdates: Vec::new(),
        }
    }

    /// Appends an exception day. Idempotent: re-adding an existing day
    /// is a no-op. Returns whether the set changed.
    pub fn add_exdate(&mut self, day: DayKey) -> bool {
        if self.exdates.contains(&day) {
            return false;
        }
        self.exdates.push(day);
        true
    }
}

/// A persisted schedulable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub user_id: i64,
    pub kind: ItemKind,
    pub day: DayKey,
    pub time_start: Option<TimeOfDay>,
    pub time_end: Option<TimeOfDay>,
    pub title: String,
    pub details: Option<String>,
    pub status: Option<TaskStatus>,
    /// Present only on masters.
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    /// Present only on overrides: the master this row replaces one
    /// occurrence of.
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Present only on overrides: the occurrence day replaced.
    #[serde(default)]
    pub occurrence_day: Option<DayKey>,
}

impl Item {
    /// Whether this row is a recurring master.
    #[must_use]
    pub const fn is_master(&self) -> bool {
        self.recurrence.is_some() && self.parent_id.is_none()
    }

    /// Whether this row overrides one occurrence of a master.
    #[must_use]
    pub const fn is_override(&self) -> bool {
        self.parent_id.is_some() && self.occurrence_day.is_some()
    }
}

/// Input payload for creating an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub kind: ItemKind,
    pub day: DayKey,
    #[serde(default)]
    pub time_start: Option<TimeOfDay>,
    #[serde(default)]
    pub time_end: Option<TimeOfDay>,
    pub title: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
}

impl NewItem {
    /// ## Summary
    /// Validates the payload: title non-empty and within the stored
    /// column width. Day and time fields are already validated by their
    /// types.
    ///
    /// ## Errors
    /// Returns a validation error naming the offending field.
    pub fn validate(&self) -> CoreResult<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "title must not be empty".to_string(),
            ));
        }
        if self.title.chars().count() > TITLE_MAX_LEN {
            return Err(CoreError::ValidationError(format!(
                "title longer than {TITLE_MAX_LEN} characters"
            )));
        }
        Ok(())
    }
}
