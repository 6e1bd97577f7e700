//! Item storage contract and in-memory reference implementation.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use weekboard_core::day::DayKey;
use weekboard_core::item::{Item, NewItem};
use weekboard_engine::range::DayRange;

use crate::error::{ServiceError, ServiceResult};

/// Storage contract the expansion pipeline relies on.
///
/// All operations are scoped to one user; a store never returns another
/// user's rows.
pub trait ItemStore: Send + Sync {
    /// Fetches every row that could contribute to a window:
    ///
    /// - non-recurring rows whose day falls in the window;
    /// - master rows whose own day is on or before the window end and
    ///   whose until-day, if any, is on or after the window start (a
    ///   master anchored before the window may still produce inside it);
    /// - override rows whose occurrence day falls in the window;
    /// - additionally, every override referencing any master in the
    ///   result, even when its occurrence day lies outside the window,
    ///   so the expansion's override index is complete. Out-of-window
    ///   emissions are dropped by the engine's own range filter.
    fn items_in_window(
        &self,
        user_id: i64,
        range: DayRange,
    ) -> impl Future<Output = ServiceResult<Vec<Item>>> + Send;

    /// Fetches one row by identity.
    fn get_item(
        &self,
        user_id: i64,
        item_id: i64,
    ) -> impl Future<Output = ServiceResult<Option<Item>>> + Send;

    /// Persists a new row and returns it with its assigned identity.
    fn create_item(
        &self,
        user_id: i64,
        input: NewItem,
    ) -> impl Future<Output = ServiceResult<Item>> + Send;

    /// Appends an exception day to a master's exception set.
    ///
    /// Idempotent set-union: re-adding an existing day is a no-op, not
    /// an error. Returns the updated master.
    fn add_exception(
        &self,
        user_id: i64,
        master_id: i64,
        day: DayKey,
    ) -> impl Future<Output = ServiceResult<Item>> + Send;

    /// Persists an override row for `(master_id, occurrence day)`.
    ///
    /// At most one override may exist per master and day; a second
    /// insert is a conflict.
    fn insert_override(
        &self,
        user_id: i64,
        master_id: i64,
        occurrence_day: DayKey,
        content: NewItem,
    ) -> impl Future<Output = ServiceResult<Item>> + Send;
}

/// In-memory store used by tests and as the reference behavior for real
/// backends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    items: HashMap<i64, Item>,
    next_id: i64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully-formed row, keeping its identity. Test seam.
    pub async fn insert(&self, item: Item) {
        let mut inner = self.inner.write().await;
        inner.next_id = inner.next_id.max(item.id);
        inner.items.insert(item.id, item);
    }

    async fn allocate_id(&self) -> i64 {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        inner.next_id
    }
}

fn row_from_input(id: i64, user_id: i64, input: NewItem) -> Item {
    Item {
        id,
        user_id,
        kind: input.kind,
        day: input.day,
        time_start: input.time_start,
        time_end: input.time_end,
        title: input.title,
        details: input.details,
        status: input.status,
        recurrence: input.recurrence,
        parent_id: None,
        occurrence_day: None,
    }
}

impl ItemStore for MemoryStore {
    async fn items_in_window(&self, user_id: i64, range: DayRange) -> ServiceResult<Vec<Item>> {
        let inner = self.inner.read().await;

        let mut rows: Vec<&Item> = inner
            .items
            .values()
            .filter(|item| item.user_id == user_id)
            .filter(|item| {
                if item.is_override() {
                    return item.occurrence_day.is_some_and(|d| range.contains(d));
                }
                if let Some(recurrence) = &item.recurrence {
                    return item.day <= range.end()
                        && recurrence.until_day.is_none_or(|u| u >= range.start());
                }
                range.contains(item.day)
            })
            .collect();

        // Complete the override index for every master in the result.
        let master_ids: HashSet<i64> =
            rows.iter().filter(|i| i.is_master()).map(|i| i.id).collect();
        let picked: HashSet<i64> = rows.iter().map(|i| i.id).collect();
        rows.extend(inner.items.values().filter(|item| {
            item.user_id == user_id
                && !picked.contains(&item.id)
                && item.is_override()
                && item.parent_id.is_some_and(|p| master_ids.contains(&p))
        }));

        rows.sort_by_key(|item| (item.day, item.id));
        Ok(rows.into_iter().cloned().collect())
    }

    async fn get_item(&self, user_id: i64, item_id: i64) -> ServiceResult<Option<Item>> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .get(&item_id)
            .filter(|item| item.user_id == user_id)
            .cloned())
    }

    async fn create_item(&self, user_id: i64, input: NewItem) -> ServiceResult<Item> {
        let id = self.allocate_id().await;
        let row = row_from_input(id, user_id, input);
        self.inner.write().await.items.insert(id, row.clone());
        Ok(row)
    }

    async fn add_exception(
        &self,
        user_id: i64,
        master_id: i64,
        day: DayKey,
    ) -> ServiceResult<Item> {
        let mut inner = self.inner.write().await;
        let item = inner
            .items
            .get_mut(&master_id)
            .filter(|item| item.user_id == user_id)
            .ok_or_else(|| ServiceError::NotFound(format!("item {master_id}")))?;
        let recurrence = item
            .recurrence
            .as_mut()
            .ok_or_else(|| ServiceError::NotFound(format!("item {master_id} is not recurring")))?;
        recurrence.add_exdate(day);
        Ok(item.clone())
    }

    async fn insert_override(
        &self,
        user_id: i64,
        master_id: i64,
        occurrence_day: DayKey,
        content: NewItem,
    ) -> ServiceResult<Item> {
        let id = self.allocate_id().await;
        let mut inner = self.inner.write().await;

        let exists = inner.items.values().any(|item| {
            item.parent_id == Some(master_id) && item.occurrence_day == Some(occurrence_day)
        });
        if exists {
            return Err(ServiceError::Conflict(format!(
                "override for item {master_id} on {occurrence_day} already exists"
            )));
        }

        let row = Item {
            parent_id: Some(master_id),
            occurrence_day: Some(occurrence_day),
            day: occurrence_day,
            recurrence: None,
            ..row_from_input(id, user_id, content)
        };
        inner.items.insert(id, row.clone());
        Ok(row)
    }
}
