// ABOUTME: EventCatalog implements the five catalog operations over an injected store and clock.
// ABOUTME: All input validation runs before the store is touched, so rejected requests have no side effects.

use std::sync::Arc;

use thiserror::Error;

use crate::clock::Clock;
use crate::model::{Event, NewEvent};
use crate::store::{EventFilter, EventStore, StoreError};
use crate::validate::{self, ValidationError};

/// Message returned whenever an id does not match a stored event.
pub const NOT_FOUND_MESSAGE: &str = "The event doesn't exist!";

/// Errors surfaced by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("event {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The event catalog. Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct EventCatalog {
    store: Arc<dyn EventStore>,
    clock: Arc<dyn Clock>,
}

impl EventCatalog {
    pub fn new(store: Arc<dyn EventStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// List events, restricted to the closed range `[start_date, end_date]`
    /// when both bounds are given. A malformed bound is rejected.
    pub fn list(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<Event>, CatalogError> {
        let start = validate::parse_filter_date("start_date", start_date)?;
        let end = validate::parse_filter_date("end_date", end_date)?;
        let filter = EventFilter::from_bounds(start, end);
        tracing::debug!(?filter, "listing events");
        Ok(self.store.query(&filter)?)
    }

    /// Events dated on the clock's current day.
    pub fn today(&self) -> Result<Vec<Event>, CatalogError> {
        let today = self.clock.today();
        Ok(self.store.query(&EventFilter::On(today))?)
    }

    pub fn create(&self, name: Option<&str>, date: Option<&str>) -> Result<Event, CatalogError> {
        let name = validate::validate_name(name)?;
        let date = validate::parse_date("date", date)?;
        let event = self.store.insert(NewEvent::new(name, date))?;
        tracing::info!(id = event.id, date = %event.date, "event created");
        Ok(event)
    }

    pub fn get(&self, id: i64) -> Result<Event, CatalogError> {
        self.store.get(id)?.ok_or(CatalogError::NotFound(id))
    }

    /// Remove the event with `id`, returning the record as it was.
    pub fn delete(&self, id: i64) -> Result<Event, CatalogError> {
        let event = self.get(id)?;
        // A concurrent delete may win between the read and the removal.
        if !self.store.delete(id)? {
            return Err(CatalogError::NotFound(id));
        }
        tracing::info!(id, "event deleted");
        Ok(event)
    }

    pub fn count(&self) -> Result<usize, CatalogError> {
        Ok(self.store.count()?)
    }
}
