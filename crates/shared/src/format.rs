//! Display formatting shared by the GUI and the CLI.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Renders an ISO timestamp as `dd/mm/yyyy`.
///
/// The calendar date is taken in the timestamp's own offset, so the same
/// input always yields the same output regardless of the host timezone.
/// Unparseable input is returned unchanged.
pub fn format_event_date(raw: &str) -> String {
    match parse_calendar_date(raw) {
        Some(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    // Postgres text output, e.g. `2024-05-01 10:00:00+00`.
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(ts) = DateTime::parse_from_str(raw, fmt) {
            return Some(ts.date_naive());
        }
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
