//! Display helpers shared by every page.

use chrono::{DateTime, Local};

/// Placeholder for values that are absent.
pub const EMPTY: &str = "—";

/// Formats a backend RFC 3339 timestamp in local time.
///
/// Unparseable input is shown verbatim; empty input shows [`EMPTY`].
pub fn timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return EMPTY.to_string();
    }
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// Formats a content review's `created` field.
///
/// The backend reports never-set dates as year 1.
pub fn review_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("0001") {
        return EMPTY.to_string();
    }
    timestamp(raw)
}

/// Shows [`EMPTY`] for blank strings.
pub fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { EMPTY } else { value }
}

/// Truncates to `max_chars` characters, appending `…` when anything was cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
