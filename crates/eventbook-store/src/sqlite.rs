// ABOUTME: SQLite-backed EventStore keeping one row per event in a single `events` table.
// ABOUTME: Dates are stored as YYYY-MM-DD text so range predicates compare lexically.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use eventbook_core::{
    DATE_FORMAT, Event, EventFilter, EventStore, NewEvent, StoreError, parse_calendar_date,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;

/// Errors that can occur during SQLite store operations.
#[derive(Debug, Error)]
pub enum SqliteError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("row {id} has unparseable date {value:?}")]
    BadDate { id: i64, value: String },

    #[error("date {0} has no four-digit year")]
    DateOutOfRange(NaiveDate),
}

impl From<SqliteError> for StoreError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::Poisoned => StoreError::Poisoned,
            SqliteError::BadDate { id, value } => StoreError::Corrupt {
                id,
                reason: format!("unparseable date {value:?}"),
            },
            other => StoreError::Backend(Box::new(other)),
        }
    }
}

/// An event store persisted in a SQLite database.
/// The connection is serialized behind a mutex, so concurrent inserts never
/// race on id assignment.
pub struct SqliteEventStore {
    conn: Mutex<Connection>,
}

impl SqliteEventStore {
    /// Open or create a database at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self, SqliteError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        tracing::info!(path = %path.display(), "opened event database");
        Self::init(conn)
    }

    /// Open a private in-memory database. Contents are lost on drop.
    pub fn open_in_memory() -> Result<Self, SqliteError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, SqliteError> {
        // AUTOINCREMENT keeps SQLite from handing out the id of a deleted row.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event TEXT NOT NULL,
                date TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_date ON events(date);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, SqliteError> {
        self.conn.lock().map_err(|_| SqliteError::Poisoned)
    }

    fn insert_row(&self, event: NewEvent) -> Result<Event, SqliteError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO events (event, date) VALUES (?1, ?2)",
            params![event.name, storable_date(&event.date)?],
        )?;
        Ok(event.with_id(conn.last_insert_rowid()))
    }

    fn query_rows(&self, filter: &EventFilter) -> Result<Vec<Event>, SqliteError> {
        let conn = self.conn()?;
        let rows = match filter {
            EventFilter::All => {
                let mut stmt = conn.prepare("SELECT id, event, date FROM events ORDER BY id ASC")?;
                collect_rows(stmt.query_map([], read_row)?)?
            }
            EventFilter::On(day) => {
                let mut stmt = conn
                    .prepare("SELECT id, event, date FROM events WHERE date = ?1 ORDER BY id ASC")?;
                collect_rows(stmt.query_map(params![format_date(day)], read_row)?)?
            }
            EventFilter::Between { start, end } => {
                // Every stored date lies in the four-digit span, so clamping
                // the bounds keeps the text comparison in calendar order.
                let start = (*start).max(min_storable());
                let end = (*end).min(max_storable());
                let mut stmt = conn.prepare(
                    "SELECT id, event, date FROM events
                     WHERE date BETWEEN ?1 AND ?2 ORDER BY id ASC",
                )?;
                collect_rows(
                    stmt.query_map(params![format_date(&start), format_date(&end)], read_row)?,
                )?
            }
        };

        rows.into_iter().map(into_event).collect()
    }

    fn get_row(&self, id: i64) -> Result<Option<Event>, SqliteError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, event, date FROM events WHERE id = ?1",
                params![id],
                read_row,
            )
            .optional()?;
        row.map(into_event).transpose()
    }

    fn delete_row(&self, id: i64) -> Result<bool, SqliteError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM events WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn count_rows(&self) -> Result<usize, SqliteError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl EventStore for SqliteEventStore {
    fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        Ok(self.insert_row(event)?)
    }

    fn query(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        Ok(self.query_rows(filter)?)
    }

    fn get(&self, id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self.get_row(id)?)
    }

    fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.delete_row(id)?)
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.count_rows()?)
    }
}

/// A raw `events` row before the date column is parsed.
struct EventRow {
    id: i64,
    event: String,
    date: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        event: row.get(1)?,
        date: row.get(2)?,
    })
}

fn collect_rows(
    rows: impl Iterator<Item = rusqlite::Result<EventRow>>,
) -> Result<Vec<EventRow>, SqliteError> {
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn into_event(row: EventRow) -> Result<Event, SqliteError> {
    let date = parse_calendar_date(&row.date).ok_or_else(|| SqliteError::BadDate {
        id: row.id,
        value: row.date.clone(),
    })?;
    Ok(Event {
        id: row.id,
        name: row.event,
        date,
    })
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn min_storable() -> NaiveDate {
    NaiveDate::from_ymd_opt(0, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn max_storable() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Format a date for the `date` column, refusing years whose text form would
/// not sort with the rest.
fn storable_date(date: &NaiveDate) -> Result<String, SqliteError> {
    if *date < min_storable() || *date > max_storable() {
        return Err(SqliteError::DateOutOfRange(*date));
    }
    Ok(format_date(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed(store: &SqliteEventStore, rows: &[(&str, &str)]) -> Vec<Event> {
        rows.iter()
            .map(|(name, date)| store.insert(NewEvent::new(*name, day(date))).unwrap())
            .collect()
    }

    #[test]
    fn sqlite_insert_and_get() {
        let store = SqliteEventStore::open_in_memory().unwrap();
        let created = store
            .insert(NewEvent::new("Video conference", day("2024-03-15")))
            .unwrap();

        let fetched = store.get(created.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Video conference");
        assert_eq!(fetched.date, day("2024-03-15"));
        assert!(store.get(created.id + 1).unwrap().is_none());
    }

    #[test]
    fn sqlite_ids_increase_and_are_not_reused() {
        let store = SqliteEventStore::open_in_memory().unwrap();
        let first = seed(&store, &[("a", "2024-01-01"), ("b", "2024-01-02")]);
        assert!(store.delete(first[1].id).unwrap());

        let next = store.insert(NewEvent::new("c", day("2024-01-03"))).unwrap();
        assert!(next.id > first[1].id);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn sqlite_filters_by_date_and_range() {
        let store = SqliteEventStore::open_in_memory().unwrap();
        seed(
            &store,
            &[
                ("new year", "2024-01-01"),
                ("leap", "2024-02-29"),
                ("ides", "2024-03-15"),
                ("also ides", "2024-03-15"),
                ("year end", "2024-12-31"),
            ],
        );

        let on = store.query(&EventFilter::On(day("2024-03-15"))).unwrap();
        let names: Vec<_> = on.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["ides", "also ides"]);

        let range = store
            .query(&EventFilter::Between {
                start: day("2024-02-29"),
                end: day("2024-03-15"),
            })
            .unwrap();
        assert_eq!(range.len(), 3);

        let inverted = store
            .query(&EventFilter::Between {
                start: day("2024-12-31"),
                end: day("2024-01-01"),
            })
            .unwrap();
        assert!(inverted.is_empty());

        assert_eq!(store.query(&EventFilter::All).unwrap().len(), 5);
    }

    #[test]
    fn sqlite_range_matches_filter_at_year_boundaries() {
        let store = SqliteEventStore::open_in_memory().unwrap();
        let memory = eventbook_core::MemoryEventStore::new();
        for (name, date) in [
            ("first day", ymd(0, 1, 1)),
            ("y1k", ymd(999, 12, 31)),
            ("y1k next", ymd(1000, 1, 1)),
            ("new year", ymd(2024, 1, 1)),
            ("last day", ymd(9999, 12, 31)),
        ] {
            store.insert(NewEvent::new(name, date)).unwrap();
            memory.insert(NewEvent::new(name, date)).unwrap();
        }

        let ranges = [
            (ymd(999, 12, 31), ymd(1000, 1, 1)),
            (ymd(2024, 1, 1), ymd(9999, 12, 31)),
            (ymd(2024, 1, 1), ymd(10001, 1, 1)),
            (ymd(-5, 1, 1), ymd(999, 12, 31)),
            (ymd(-5, 1, 1), ymd(10001, 1, 1)),
        ];
        for (start, end) in ranges {
            let filter = EventFilter::Between { start, end };
            let names = |events: Vec<Event>| -> Vec<String> {
                events.into_iter().map(|e| e.name).collect()
            };
            assert_eq!(
                names(store.query(&filter).unwrap()),
                names(memory.query(&filter).unwrap()),
                "range {start}..={end}"
            );
        }

        let all = store
            .query(&EventFilter::Between {
                start: ymd(-5, 1, 1),
                end: ymd(10001, 1, 1),
            })
            .unwrap();
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn sqlite_rejects_dates_without_four_digit_year() {
        let store = SqliteEventStore::open_in_memory().unwrap();
        let err = store
            .insert(NewEvent::new("far future", ymd(10000, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)), "got {err:?}");
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn sqlite_delete_missing_returns_false() {
        let store = SqliteEventStore::open_in_memory().unwrap();
        assert!(!store.delete(12).unwrap());
    }

    #[test]
    fn sqlite_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("event.db");

        let id = {
            let store = SqliteEventStore::open(&db_path).unwrap();
            store.insert(NewEvent::new("Persisted", day("2025-07-04"))).unwrap().id
        };

        let store = SqliteEventStore::open(&db_path).unwrap();
        let event = store.get(id).unwrap().unwrap();
        assert_eq!(event.name, "Persisted");
        assert_eq!(event.date, day("2025-07-04"));
    }

    #[test]
    fn sqlite_reports_corrupt_dates() {
        let store = SqliteEventStore::open_in_memory().unwrap();
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO events (event, date) VALUES ('broken', 'March 3rd')",
                [],
            )
            .unwrap();

        let err = store.query(&EventFilter::All).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }), "got {err:?}");
    }
}
