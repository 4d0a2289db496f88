use chrono::{DateTime, NaiveDate, Utc};

/// Leniently parses a date or date-time string. Accepts a bare
/// ISO-8601 date (`2023-01-03`) or an RFC 3339 date-time
/// (`2023-01-03T12:00:00Z`); anything else yields `None` rather than an
/// error, matching the parser's "malformed input never fails" contract.
pub fn parse_lenient_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
