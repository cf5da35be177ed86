// ABOUTME: Defines the Event record stored by the catalog and the unsaved NewEvent input.
// ABOUTME: Dates are calendar days with no time component, formatted as YYYY-MM-DD at every boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The only date format accepted on input and produced on output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date written exactly as `YYYY-MM-DD`: four-digit year, zero-padded
/// month and day. Signed, five-digit, or unpadded forms are rejected so that
/// the text form round-trips and sorts in calendar order.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let b = raw.as_bytes();
    let shaped = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && [0, 1, 2, 3, 5, 6, 8, 9].iter().all(|&i| b[i].is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// A persisted event. The `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
}

impl Event {
    /// The event date rendered as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// A validated event that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub date: NaiveDate,
}

impl NewEvent {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }

    /// Attach a store-assigned id, producing the persisted record.
    pub fn with_id(self, id: i64) -> Event {
        Event {
            id,
            name: self.name,
            date: self.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_string_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let event = NewEvent::new("Dentist", date).with_id(7);
        assert_eq!(event.id, 7);
        assert_eq!(event.name, "Dentist");
        assert_eq!(event.date_string(), "2024-03-05");
    }

    #[test]
    fn calendar_date_requires_exact_shape() {
        assert_eq!(
            parse_calendar_date("0001-01-01"),
            NaiveDate::from_ymd_opt(1, 1, 1)
        );
        assert_eq!(
            parse_calendar_date("9999-12-31"),
            NaiveDate::from_ymd_opt(9999, 12, 31)
        );
        for bad in [
            "+10000-01-01",
            "2024-3-5",
            "2024-03-5",
            "+2024-03-05",
            "2024-13-01",
            " 2024-03-05",
        ] {
            assert_eq!(parse_calendar_date(bad), None, "input {bad:?}");
        }
    }
}
