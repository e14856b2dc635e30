//! ISO-8601 local date-time fields.
//!
//! Written as `2022-01-03T00:00:00`. Read with or without seconds, so
//! `2022-01-03T00:00` (what a `datetime-local` form input sends) is accepted.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer, de};

const WITHOUT_SECONDS: &str = "%Y-%m-%dT%H:%M";

pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format("%Y-%m-%dT%H:%M:%S%.f"))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(de::Error::custom)
}

pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    raw.parse::<NaiveDateTime>()
        .or_else(|e| NaiveDateTime::parse_from_str(raw, WITHOUT_SECONDS).map_err(|_| e))
}
