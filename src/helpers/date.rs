//! Date helper functions

use chrono::{NaiveDate, TimeZone, Utc};

/// `2024-01-15T00:00:00Z`, used by the `PUBLISHED_DATE_yyyy-MM-ddTHH:mm:ssZ` token
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%dT00:00:00Z").to_string()
}

/// `Jan 15, 2024`, used by the `PUBLISHED_DATE_MMM dd, yyyy` token
pub fn short_date(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// RFC 2822 timestamp at midnight UTC, as RSS expects
pub fn rfc2822_date(date: NaiveDate) -> String {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&midnight).to_rfc2822()
}
