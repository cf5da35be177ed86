// ABOUTME: HTTP server for eventbook, exposing the event catalog as a small JSON API.
// ABOUTME: Uses Axum with a shared catalog handle injected through router state.

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, EventbookConfig};
pub use error::ApiError;
pub use routes::create_router;
