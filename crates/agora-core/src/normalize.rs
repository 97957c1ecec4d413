//! Canonical shapes for documents returned to callers.
//!
//! Listing dates are stored with full precision but exposed as calendar
//! days (`YYYY-MM-DD`, the HTML date input format). Normalizing before a
//! value is cached guarantees that a cache hit and a fresh fetch of the same
//! record produce identical values.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Format used for listing dates on the wire and in the cache.
pub const HTML_DATE_FORMAT: &str = "%Y-%m-%d";

/// Field transforms applied to a document before it is returned or cached.
pub trait Normalize {
    /// Rewrites the value in place into its canonical form.
    fn normalize(&mut self);
}

impl<T: Normalize> Normalize for Vec<T> {
    fn normalize(&mut self) {
        for item in self.iter_mut() {
            item.normalize();
        }
    }
}

impl<T: Normalize> Normalize for Option<T> {
    fn normalize(&mut self) {
        if let Some(value) = self {
            value.normalize();
        }
    }
}

/// Truncates an instant to the start of its UTC calendar day.
///
/// # Example
///
/// ```
/// use agora_core::normalize::listing_day;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 2).unwrap();
/// assert_eq!(listing_day(at), Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap());
/// ```
pub fn listing_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Formats an instant as an HTML date (`YYYY-MM-DD`).
pub fn html_date(at: DateTime<Utc>) -> String {
    at.format(HTML_DATE_FORMAT).to_string()
}

/// Serde adapter writing listing dates as `YYYY-MM-DD`.
///
/// Reads either a plain date or a full RFC 3339 timestamp so documents
/// written before normalization can still be decoded.
pub mod serde_html_date {
    use super::*;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&html_date(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(day) = NaiveDate::parse_from_str(&raw, HTML_DATE_FORMAT) {
            return Ok(day.and_time(NaiveTime::MIN).and_utc());
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
