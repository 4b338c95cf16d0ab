//! Publication date parsing.
//!
//! Feeds mix RFC-822 and ISO-8601 dates. Each format is one entry in
//! [`PARSERS`], tried in order; a value none of them accept sorts as the
//! oldest possible timestamp instead of failing.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

pub const RFC822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

pub type Parser = fn(&str) -> Option<DateTime<FixedOffset>>;

/// Attempted in order; the first success wins.
pub const PARSERS: &[Parser] = &[parse_rfc822, parse_iso8601];

/// Parses `Mon, 09 Dec 2024 12:00:00 +0900`, also accepting zone names like `GMT`.
pub fn parse_rfc822(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    DateTime::parse_from_str(value, RFC822_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .ok()
}

/// Parses ISO-8601 datetimes and bare dates. Offset-less values are taken as UTC.
pub fn parse_iso8601(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    let value = match value.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => value.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.f%:z") {
        return Some(dt);
    }

    let utc = FixedOffset::east_opt(0)?;
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&value, format) {
            return Some(naive.and_utc().with_timezone(&utc));
        }
    }

    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().with_timezone(&utc))
}

/// Sort key for an entry's `published` value. Never fails.
pub fn published_at(value: &str) -> DateTime<Utc> {
    PARSERS
        .iter()
        .find_map(|parse| parse(value))
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
