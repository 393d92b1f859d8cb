//! Worked-hours arithmetic over a list of punches.
//!
//! Punches are paired in the order given: an entry opens a shift and the next
//! exit closes it. Unmatched exits, a trailing open entry, and timestamps that
//! fail to parse contribute nothing.

#[cfg(test)]
#[path = "hours_test.rs"]
mod tests;

use time::macros::format_description;
use time::{Duration, PrimitiveDateTime};

use crate::net::types::{AttendanceRecord, PunchKind};

/// Parse a backend timestamp.
///
/// Accepts the day-first form the records query returns
/// (`DD-MM-YYYY HH:MM[:SS]`) and the ISO-ish form punches are created with
/// (`YYYY-MM-DD HH:MM[:SS]`).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    PrimitiveDateTime::parse(raw, format_description!("[day]-[month]-[year] [hour]:[minute]:[second]"))
        .or_else(|_| PrimitiveDateTime::parse(raw, format_description!("[day]-[month]-[year] [hour]:[minute]")))
        .or_else(|_| PrimitiveDateTime::parse(raw, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]")))
        .or_else(|_| PrimitiveDateTime::parse(raw, format_description!("[year]-[month]-[day] [hour]:[minute]")))
        .ok()
}

/// Rewrite a `YYYY-MM-DD` date as `DD-MM-YYYY`; other shapes pass through.
#[must_use]
pub fn day_first(date: &str) -> String {
    let mut parts = date.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day)) if year.len() == 4 => format!("{day}-{month}-{year}"),
        _ => date.to_owned(),
    }
}

/// Sum of all closed entry/exit pairs.
#[must_use]
pub fn total_worked(records: &[AttendanceRecord]) -> Duration {
    let mut total = Duration::ZERO;
    let mut open: Option<PrimitiveDateTime> = None;

    for record in records {
        match record.kind {
            PunchKind::Entry => open = parse_timestamp(&record.timestamp),
            PunchKind::Exit => {
                let Some(entry) = open.take() else {
                    continue;
                };
                let Some(exit) = parse_timestamp(&record.timestamp) else {
                    continue;
                };
                let shift = exit - entry;
                if shift.is_positive() {
                    total += shift;
                }
            }
        }
    }
    total
}

/// Render a duration as `HH:MM`, truncating seconds. Hours are not capped.
#[must_use]
pub fn format_hhmm(duration: Duration) -> String {
    let minutes = duration.whole_minutes().max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
