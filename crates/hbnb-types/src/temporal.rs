use std::fmt;

use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Wire format: ISO-8601 with microseconds, no offset.
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Parse format: the fractional part is optional.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Naive UTC timestamp at microsecond precision.
///
/// Timestamps are truncated to whole microseconds when taken so that the
/// ISO-8601 rendering is lossless: `parse(t.to_string()) == t`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// The current UTC wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().naive_utc().trunc_subsecs(6))
    }

    /// A timestamp strictly after `prev`: the current time, or `prev` plus one
    /// microsecond when the clock has not advanced past it.
    ///
    /// Saturates: at the largest representable instant `prev` is returned.
    pub fn after(prev: &Self) -> Self {
        let now = Self::now();
        if now > *prev {
            return now;
        }
        prev.0
            .checked_add_signed(TimeDelta::microseconds(1))
            .map_or(*prev, Self)
    }

    /// Build from a UNIX timestamp in microseconds.
    pub fn from_micros(micros: i64) -> Option<Self> {
        DateTime::from_timestamp_micros(micros).map(|dt| Self(dt.naive_utc()))
    }

    /// Parse an ISO-8601 string (`YYYY-MM-DDTHH:MM:SS[.ffffff]`).
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        NaiveDateTime::parse_from_str(s, PARSE_FORMAT)
            .map(|dt| Self(dt.trunc_subsecs(6)))
            .map_err(|e| TypeError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Microseconds since the UNIX epoch.
    pub fn as_micros(&self) -> i64 {
        self.0.and_utc().timestamp_micros()
    }

}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({self})")
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
