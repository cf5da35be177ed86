// ABOUTME: Shared application state for the eventbook HTTP server.
// ABOUTME: Holds the EventCatalog that every handler dispatches to.

use std::sync::Arc;

use eventbook_core::{Clock, EventCatalog, EventStore};

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    pub catalog: EventCatalog,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog: EventCatalog::new(store, clock),
        }
    }
}
