// ABOUTME: The EventStore trait that every persistence backend implements, plus the query filter it evaluates.
// ABOUTME: Also provides MemoryEventStore, a mutex-guarded in-process store used as a test double.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{Event, NewEvent};

/// Errors raised by a storage backend. Always fatal for the request that hit them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// Which events a query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    All,
    /// Events on exactly this date.
    On(NaiveDate),
    /// Events with `start <= date <= end`. Empty when `start > end`.
    Between { start: NaiveDate, end: NaiveDate },
}

impl EventFilter {
    /// Build the list filter from two optional bounds. A range applies only
    /// when both bounds are present.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => Self::Between { start, end },
            _ => Self::All,
        }
    }

    pub fn matches(&self, date: &NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::On(day) => date == day,
            Self::Between { start, end } => start <= date && date <= end,
        }
    }
}

/// Durable storage for events.
///
/// Implementations assign ids: unique, strictly increasing, never reused
/// after a delete. Query results are ordered by id ascending.
pub trait EventStore: Send + Sync {
    fn insert(&self, event: NewEvent) -> Result<Event, StoreError>;

    fn query(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError>;

    fn get(&self, id: i64) -> Result<Option<Event>, StoreError>;

    /// Remove the event with `id`. Returns whether a record was removed.
    fn delete(&self, id: i64) -> Result<bool, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    events: BTreeMap<i64, Event>,
    last_id: i64,
}

/// An in-process store backed by a BTreeMap. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl EventStore for MemoryEventStore {
    fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        let mut inner = self.lock()?;
        inner.last_id += 1;
        let event = event.with_id(inner.last_id);
        inner.events.insert(event.id, event.clone());
        Ok(event)
    }

    fn query(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .events
            .values()
            .filter(|e| filter.matches(&e.date))
            .cloned()
            .collect())
    }

    fn get(&self, id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self.lock()?.events.get(&id).cloned())
    }

    fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.lock()?.events.remove(&id).is_some())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.events.len())
    }
}
