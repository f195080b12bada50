//! Best-effort parsing of the date text found on news listing pages.
//!
//! Listing pages rarely agree on a date format, so parsing tries a fixed
//! ordered list of absolute formats and takes the first that matches. All
//! results are normalized to UTC. Every function here returns `Option`;
//! substituting "now" for an unparseable date is the extractor's decision,
//! not this module's.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Absolute date formats, tried in order. First match wins.
const DATE_FORMATS: [&str; 4] = [
    "%B %d, %Y", // January 15, 2025
    "%b %d, %Y", // Jan 15, 2025
    "%Y-%m-%d",  // 2025-01-15
    "%m/%d/%Y",  // 01/15/2025
];

/// Matches long-month dates like "January 17, 2025" anywhere in a blob of text.
static MONTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}",
    )
    .unwrap()
});

/// Parse a trimmed date string against the known formats.
///
/// Dates carry no time-of-day on listing pages, so a successful parse is
/// pinned to UTC midnight.
///
/// # Returns
///
/// `Some` for text matching any format in [`DATE_FORMATS`], `None` otherwise.
pub fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date.and_time(NaiveTime::MIN).and_utc());
        }
    }
    None
}

/// Parse the machine-readable value of a `<time datetime="…">` attribute.
///
/// RFC 3339 timestamps are taken as-is; some sites put a bare date in the
/// attribute instead, so the plain-text formats are tried as a fallback.
pub fn parse_datetime_attr(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_date_text(trimmed)
}

/// Scan free-form text for an embedded long-month date.
///
/// Some listings print the date inline with other container text
/// ("Recent News January 17, 2025 Statement on …") rather than in a
/// dedicated node; this pulls the first such date out of the blob.
pub fn scan_date_in_text(text: &str) -> Option<DateTime<Utc>> {
    MONTH_DATE_RE
        .find(text)
        .and_then(|m| parse_date_text(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc_date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_long_month_name() {
        assert_eq!(parse_date_text("January 15, 2025"), Some(utc_date(2025, 1, 15)));
        assert_eq!(parse_date_text("  December 22, 2024 "), Some(utc_date(2024, 12, 22)));
    }

    #[test]
    fn test_parse_abbreviated_month_name() {
        assert_eq!(parse_date_text("Jan 15, 2025"), Some(utc_date(2025, 1, 15)));
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date_text("2025-01-15"), Some(utc_date(2025, 1, 15)));
    }

    #[test]
    fn test_parse_numeric_date() {
        assert_eq!(parse_date_text("01/15/2025"), Some(utc_date(2025, 1, 15)));
    }

    #[test]
    fn test_unparseable_text_is_none() {
        assert_eq!(parse_date_text("not a date"), None);
        assert_eq!(parse_date_text(""), None);
        assert_eq!(parse_date_text("3 hours ago"), None);
    }

    #[test]
    fn test_datetime_attr_rfc3339() {
        assert_eq!(
            parse_datetime_attr("2025-02-03T04:05:06Z"),
            Some(Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap())
        );
        // Offset timestamps normalize to UTC.
        assert_eq!(
            parse_datetime_attr("2025-02-03T04:05:06-05:00"),
            Some(Utc.with_ymd_and_hms(2025, 2, 3, 9, 5, 6).unwrap())
        );
    }

    #[test]
    fn test_datetime_attr_bare_date() {
        assert_eq!(parse_datetime_attr("2025-02-03"), Some(utc_date(2025, 2, 3)));
    }

    #[test]
    fn test_scan_date_in_surrounding_text() {
        let text = "Recent News January 17, 2025 Statement from the press office";
        assert_eq!(scan_date_in_text(text), Some(utc_date(2025, 1, 17)));
    }

    #[test]
    fn test_scan_date_absent() {
        assert_eq!(scan_date_in_text("no dates in here"), None);
    }
}
