//! Serde adapter for task timestamps.
//!
//! Timestamps are written as RFC 3339 in UTC. Files written by older
//! versions of the tracker carry offset-less local timestamps such as
//! `2024-05-01T09:30:00.123456`; those are read in the local time zone.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp `{raw}`")))
}

/// Parses an RFC 3339 timestamp, falling back to an offset-less local one.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, LOCAL_FORMAT).ok()?;
    // Ambiguous local times (DST fold) resolve to the earlier instant.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}
