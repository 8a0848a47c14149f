use crate::error::TimecardError;
use crate::model::Hms;

/// Prepare a raw extracted line for matching: NUL bytes become spaces, then trim.
pub fn clean_text(raw: &str) -> String {
    raw.replace('\0', " ").trim().to_string()
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize a duration string to `HH:MM:SS`.
///
/// - "1:30:00" -> "01:30:00"
/// - "483:31:35" -> "483:31:35" (hours are not clamped)
/// - "2:5" -> "02:05:00" (two parts are hours and minutes)
/// - "01:30:00" -> "01:30:00"
pub fn normalize_duration(raw: &str) -> Result<String, TimecardError> {
    Ok(Hms::parse(raw)?.canonical())
}
