//! Form validation shared by every screen.
//!
//! A failed check blocks submission before any request is built.

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;

use time::macros::format_description;
use time::{Date, Time};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a date as YYYY-MM-DD (got {value:?})")]
    BadDate { field: &'static str, value: String },
    #[error("{field} must be a time as HH:MM (got {value:?})")]
    BadTime { field: &'static str, value: String },
    #[error("start date {start} is after end date {end}")]
    RangeInverted { start: String, end: String },
    #[error("please enter a valid email")]
    BadEmail,
    #[error("select or capture a photo before registering")]
    MissingPhoto,
}

/// Reject blank (or whitespace-only) values.
///
/// # Errors
///
/// Returns `Missing(field)` when `value` is blank.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `BadDate` when the value does not parse.
pub fn parse_date(field: &'static str, value: &str) -> Result<Date, ValidationError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| ValidationError::BadDate { field, value: value.to_owned() })
}

/// Parse an `HH:MM` time (seconds tolerated).
///
/// # Errors
///
/// Returns `BadTime` when the value does not parse.
pub fn parse_time(field: &'static str, value: &str) -> Result<Time, ValidationError> {
    let value_trimmed = value.trim();
    Time::parse(value_trimmed, format_description!("[hour]:[minute]"))
        .or_else(|_| Time::parse(value_trimmed, format_description!("[hour]:[minute]:[second]")))
        .map_err(|_| ValidationError::BadTime { field, value: value.to_owned() })
}

/// Check an optional date range filter. Either bound may be blank; when both
/// are present the start must not come after the end.
///
/// # Errors
///
/// Returns `BadDate` for a malformed bound and `RangeInverted` when
/// start > end.
pub fn date_range(start: &str, end: &str) -> Result<(), ValidationError> {
    let start_date = optional_date("start date", start)?;
    let end_date = optional_date("end date", end)?;
    if let (Some(s), Some(e)) = (start_date, end_date) {
        if s > e {
            return Err(ValidationError::RangeInverted {
                start: start.trim().to_owned(),
                end: end.trim().to_owned(),
            });
        }
    }
    Ok(())
}

fn optional_date(field: &'static str, value: &str) -> Result<Option<Date>, ValidationError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_date(field, value).map(Some)
}

/// Minimal email shape check: `local@domain.tld`, no whitespace, one `@`.
///
/// # Errors
///
/// Returns `BadEmail` when the shape does not match.
pub fn email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ValidationError::BadEmail);
    }
    let Some((local, domain)) = value.split_once('@') else {
        return Err(ValidationError::BadEmail);
    };
    let dotted = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if local.is_empty() || domain.contains('@') || !dotted {
        return Err(ValidationError::BadEmail);
    }
    Ok(())
}
