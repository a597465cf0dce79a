//! Lenient date parsing for request bodies.
//!
//! Clients send `YYYY-MM-DD`, `DD-MM-YYYY`, `DD/MM/YYYY` or a full RFC 3339
//! timestamp. Everything is stored as a calendar date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// `deserialize_with` for a mandatory date.
pub fn required<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
}

/// `deserialize_with` for an optional date; `null` and `""` are absent.
pub fn optional<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {raw}"))),
    }
}
