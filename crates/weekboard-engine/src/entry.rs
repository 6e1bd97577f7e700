//! Expanded board entries and their identities.
//!
//! An [`Entry`] is what expansion emits: either a persisted row passed
//! through, or a transient projection of a master onto one concrete day.
//! Generated occurrences get a synthesized identity combining the master
//! identity and the occurrence day, so re-running expansion over the
//! same window is idempotent and equality stays structural.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use weekboard_core::day::DayKey;
use weekboard_core::error::CoreError;
use weekboard_core::item::{Item, ItemKind, TaskStatus};
use weekboard_core::time::TimeOfDay;

/// Marker distinguishing synthesized occurrence identities from
/// persisted ones.
pub const OCCURRENCE_MARKER: &str = "r";

/// Delimiter joining the identity components. Never valid inside a
/// component (identities are numeric, days are ISO dates).
pub const ID_DELIMITER: char = ':';

/// Identity of a board entry.
///
/// The rendered form is opaque to collaborators: decompose it with
/// [`EntryId::parse`], never by ad hoc string splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntryId {
    /// A persisted item's own identity.
    Item(i64),
    /// Synthesized identity of a generated occurrence.
    Occurrence { master: i64, day: DayKey },
}

impl EntryId {
    /// Decomposes a rendered identity.
    ///
    /// Returns `None` for strings that are neither a persisted identity
    /// nor a well-formed occurrence identity.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(rest) = s
            .strip_prefix(OCCURRENCE_MARKER)
            .and_then(|r| r.strip_prefix(ID_DELIMITER))
        {
            let (master, day) = rest.split_once(ID_DELIMITER)?;
            return Some(Self::Occurrence {
                master: master.parse().ok()?,
                day: day.parse().ok()?,
            });
        }
        s.parse().ok().map(Self::Item)
    }

    /// The master identity a generated occurrence points back to, if
    /// this is one.
    #[must_use]
    pub const fn master(self) -> Option<i64> {
        match self {
            Self::Item(_) => None,
            Self::Occurrence { master, .. } => Some(master),
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(id) => write!(f, "{id}"),
            Self::Occurrence { master, day } => write!(
                f,
                "{OCCURRENCE_MARKER}{ID_DELIMITER}{master}{ID_DELIMITER}{day}"
            ),
        }
    }
}

impl FromStr for EntryId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::ParseError(format!("invalid entry id: {s}")))
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for EntryId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One expanded board entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub user_id: i64,
    pub kind: ItemKind,
    pub day: DayKey,
    pub time_start: Option<TimeOfDay>,
    pub time_end: Option<TimeOfDay>,
    pub title: String,
    pub details: Option<String>,
    pub status: Option<TaskStatus>,
    /// Identity of the master this entry was expanded from, if any.
    pub source_id: Option<i64>,
    /// Whether this entry was produced by rule expansion rather than
    /// stored as-is.
    pub is_occurrence: bool,
    /// Whether this entry carries override content.
    pub is_override: bool,
}

impl Entry {
    /// A non-recurring item passed through unchanged.
    #[must_use]
    pub fn plain(item: &Item) -> Self {
        Self {
            id: EntryId::Item(item.id),
            user_id: item.user_id,
            kind: item.kind,
            day: item.day,
            time_start: item.time_start,
            time_end: item.time_end,
            title: item.title.clone(),
            details: item.details.clone(),
            status: item.status,
            source_id: None,
            is_occurrence: false,
            is_override: false,
        }
    }

    /// A generated occurrence: the master's template projected onto one
    /// concrete day, under a synthesized identity.
    #[must_use]
    pub fn generated(master: &Item, day: DayKey) -> Self {
        Self {
            id: EntryId::Occurrence {
                master: master.id,
                day,
            },
            user_id: master.user_id,
            kind: master.kind,
            day,
            time_start: master.time_start,
            time_end: master.time_end,
            title: master.title.clone(),
            details: master.details.clone(),
            status: master.status,
            source_id: Some(master.id),
            is_occurrence: true,
            is_override: false,
        }
    }

    /// An override row materialized in place of a generated occurrence.
    /// Content comes from the override; the day is the occurrence day it
    /// replaces and the source is the master.
    #[must_use]
    pub fn overridden(override_row: &Item, master_id: i64, day: DayKey) -> Self {
        Self {
            id: EntryId::Item(override_row.id),
            user_id: override_row.user_id,
            kind: override_row.kind,
            day,
            time_start: override_row.time_start,
            time_end: override_row.time_end,
            title: override_row.title.clone(),
            details: override_row.details.clone(),
            status: override_row.status,
            source_id: Some(master_id),
            is_occurrence: true,
            is_override: true,
        }
    }
}
