use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats a server timestamp as `Mar 2, 2024`.
///
/// Accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS` form SQL backends emit.
/// Unparseable input is returned unchanged.
pub(crate) fn format_date(raw: &str) -> String {
    match parse_date(raw.trim()) {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
