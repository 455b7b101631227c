use chrono::{DateTime, Utc};

/// Render an App Center upload timestamp for the confirmation prompt.
/// Falls back to the raw string when the value is not RFC 3339.
pub fn format_uploaded_at(raw: &str) -> String {
    match raw.parse::<DateTime<Utc>>() {
        Ok(parsed) => parsed.format("%Y-%m-%d %H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}
