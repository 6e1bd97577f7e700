//! Board service: window loading and occurrence editing.

use chrono_tz::Tz;
use weekboard_core::clock::{Clock, SystemClock};
use weekboard_core::config::Settings;
use weekboard_core::day::DayKey;
use weekboard_core::item::{Item, NewItem};
use weekboard_engine::entry::Entry;
use weekboard_engine::range::DayRange;
use weekboard_engine::rule::parse_rule;

use crate::error::{ServiceError, ServiceResult};
use crate::store::ItemStore;

/// Orchestrates the store and the expansion engine for one board.
pub struct BoardService<S> {
    store: S,
    timezone: Tz,
    clock: Box<dyn Clock>,
}

impl<S: ItemStore> BoardService<S> {
    /// Creates a service on the system clock.
    #[must_use]
    pub fn new(store: S, timezone: Tz) -> Self {
        Self::with_clock(store, timezone, Box::new(SystemClock))
    }

    /// Creates a service with an injected clock.
    #[must_use]
    pub fn with_clock(store: S, timezone: Tz, clock: Box<dyn Clock>) -> Self {
        Self {
            store,
            timezone,
            clock,
        }
    }

    /// ## Summary
    /// Creates a service from loaded settings, on the system clock.
    ///
    /// ## Errors
    /// Returns an error if the configured timezone is unknown.
    pub fn from_settings(store: S, settings: &Settings) -> ServiceResult<Self> {
        Ok(Self::new(store, settings.board.timezone()?))
    }

    /// Today's calendar day in the board's timezone.
    #[must_use]
    pub fn today(&self) -> DayKey {
        self.clock.today(self.timezone)
    }

    /// A window of `days` days starting today.
    ///
    /// ## Errors
    /// Returns an error for a zero-day window.
    pub fn window_from_today(&self, days: u32) -> ServiceResult<DayRange> {
        Ok(DayRange::from_anchor(self.today(), days)?)
    }

    /// ## Summary
    /// Loads and expands one user's board window: fetches every row that
    /// could contribute, then runs recurrence expansion.
    ///
    /// Masters whose rule does not parse are excluded from expansion by
    /// the engine; they are logged here so the skip is observable.
    ///
    /// ## Errors
    /// Returns storage errors.
    pub async fn load_board(&self, user_id: i64, range: DayRange) -> ServiceResult<Vec<Entry>> {
        let items = self.store.items_in_window(user_id, range).await?;

        for master in items.iter().filter(|item| item.is_master()) {
            if let Some(recurrence) = &master.recurrence {
                if parse_rule(&recurrence.rule).is_none() {
                    tracing::warn!(
                        item = master.id,
                        rule = %recurrence.rule,
                        "skipping master with unparseable recurrence rule"
                    );
                }
            }
        }

        Ok(weekboard_engine::expand(&items, range))
    }

    /// ## Summary
    /// Validates and persists a new item.
    ///
    /// ## Errors
    /// Returns a validation error for a bad payload, or storage errors.
    pub async fn create_item(&self, user_id: i64, input: NewItem) -> ServiceResult<Item> {
        input.validate()?;
        self.store.create_item(user_id, input).await
    }

    /// ## Summary
    /// Appends an exception day to a master's exception set.
    ///
    /// Idempotent: re-adding an existing day is a no-op.
    ///
    /// ## Errors
    /// Returns `NotFound` if the item does not exist for this user or is
    /// not a recurring master.
    pub async fn add_exception(
        &self,
        user_id: i64,
        master_id: i64,
        day: DayKey,
    ) -> ServiceResult<Item> {
        self.require_master(user_id, master_id).await?;
        self.store.add_exception(user_id, master_id, day).await
    }

    /// ## Summary
    /// Creates an override for one occurrence of a master.
    ///
    /// The occurrence day is appended to the master's exception set and
    /// the override row is inserted as one logical operation, so
    /// expansion never sees an override next to a plain generated
    /// occurrence on the same day.
    ///
    /// ## Errors
    /// Returns `NotFound` for a missing or non-master target, a
    /// validation error for a bad payload, or `Conflict` if an override
    /// already exists for this day.
    pub async fn create_override(
        &self,
        user_id: i64,
        master_id: i64,
        occurrence_day: DayKey,
        content: NewItem,
    ) -> ServiceResult<Entry> {
        content.validate()?;
        self.require_master(user_id, master_id).await?;

        self.store
            .add_exception(user_id, master_id, occurrence_day)
            .await?;
        let row = self
            .store
            .insert_override(user_id, master_id, occurrence_day, content)
            .await?;

        Ok(Entry::overridden(&row, master_id, occurrence_day))
    }

    async fn require_master(&self, user_id: i64, master_id: i64) -> ServiceResult<Item> {
        let item = self
            .store
            .get_item(user_id, master_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("item {master_id}")))?;
        if !item.is_master() {
            return Err(ServiceError::NotFound(format!(
                "item {master_id} is not a recurring master"
            )));
        }
        Ok(item)
    }
}
