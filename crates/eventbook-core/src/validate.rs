// ABOUTME: Pure validation functions that turn raw request input into typed values.
// ABOUTME: Each failure names the offending field so the HTTP layer can report it per field.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::parse_calendar_date;

pub const NAME_REQUIRED: &str = "The event name is required!";
pub const DATE_REQUIRED: &str =
    "The event date with the correct format is required! The correct format is YYYY-MM-DD!";
pub const FILTER_DATE_FORMAT: &str = "The date must be in the format YYYY-MM-DD!";
pub const ID_INVALID: &str = "The event id must be a positive integer!";

/// A rejected input field together with the message shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Require a non-blank event name. Surrounding whitespace is trimmed.
pub fn validate_name(raw: Option<&str>) -> Result<String, ValidationError> {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ValidationError::new("event", NAME_REQUIRED)),
    }
}

/// Require a `YYYY-MM-DD` date in `field`.
pub fn parse_date(field: &'static str, raw: Option<&str>) -> Result<NaiveDate, ValidationError> {
    raw.map(str::trim)
        .and_then(parse_calendar_date)
        .ok_or_else(|| ValidationError::new(field, DATE_REQUIRED))
}

/// Parse an optional filter bound. Absent or empty means "no bound";
/// anything else must be a valid `YYYY-MM-DD` date.
pub fn parse_filter_date(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_calendar_date(s)
            .map(Some)
            .ok_or_else(|| ValidationError::new(field, FILTER_DATE_FORMAT)),
    }
}

/// Parse a path segment as a positive event id.
pub fn parse_event_id(raw: &str) -> Result<i64, ValidationError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::new("id", ID_INVALID)),
    }
}
