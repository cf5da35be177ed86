// ABOUTME: Persistence layer for eventbook.
// ABOUTME: Provides a SQLite-backed implementation of the core EventStore trait.

pub mod sqlite;

pub use sqlite::{SqliteError, SqliteEventStore};
