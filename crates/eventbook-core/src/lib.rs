// ABOUTME: Core library for eventbook, containing the event model and catalog operations.
// ABOUTME: Defines validation, query filters, the store abstraction, and the clock used for "today".

pub mod catalog;
pub mod clock;
pub mod model;
pub mod store;
pub mod validate;

pub use catalog::{CatalogError, EventCatalog, NOT_FOUND_MESSAGE};
pub use clock::{Clock, FixedClock, SystemClock};
pub use model::{DATE_FORMAT, Event, NewEvent, parse_calendar_date};
pub use store::{EventFilter, EventStore, MemoryEventStore, StoreError};
pub use validate::ValidationError;
