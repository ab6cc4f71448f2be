//! # UTC-Only Timestamps
//!
//! [`Timestamp`] is the single time type used in credential documents:
//! `issuanceDate`, `expirationDate`, `proof.created` and the verifier's
//! notion of "now". It is always UTC, truncated to whole seconds, and
//! renders as `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! Deserialization accepts only that exact form. A timestamp read from a
//! document re-serializes to the same string, so the canonical signing
//! input of a received credential is the one its issuer signed.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TemporalError;

/// A UTC timestamp with seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Wrap a `DateTime<Utc>`, discarding sub-second components.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a strict UTC RFC 3339 string (`Z` suffix required).
    ///
    /// Sub-second digits are accepted and truncated.
    pub fn parse(s: &str) -> Result<Self, TemporalError> {
        if !s.ends_with('Z') {
            return Err(TemporalError::NonUtc(s.to_string()));
        }
        Self::parse_lenient(s)
    }

    /// Parse any RFC 3339 string, converting offsets to UTC.
    ///
    /// Used at ingestion boundaries (CLI arguments, foreign documents).
    pub fn parse_lenient(s: &str) -> Result<Self, TemporalError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TemporalError::InvalidFormat {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Parse the exact wire form `YYYY-MM-DDTHH:MM:SSZ`.
    ///
    /// Fractional seconds and offsets are rejected rather than normalized.
    pub fn parse_canonical(s: &str) -> Result<Self, TemporalError> {
        let ts = Self::parse(s)?;
        if ts.to_iso8601() != s {
            return Err(TemporalError::NonCanonical(s.to_string()));
        }
        Ok(ts)
    }

    /// Build from Unix epoch seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TemporalError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or(TemporalError::Overflow)
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// This timestamp shifted forward by whole days.
    pub fn plus_days(&self, days: u32) -> Result<Self, TemporalError> {
        self.0
            .checked_add_signed(Duration::days(i64::from(days)))
            .map(Self)
            .ok_or(TemporalError::Overflow)
    }

    /// This timestamp shifted by a signed number of seconds.
    pub fn plus_secs(&self, secs: i64) -> Result<Self, TemporalError> {
        self.0
            .checked_add_signed(Duration::seconds(secs))
            .map(Self)
            .ok_or(TemporalError::Overflow)
    }

    /// Render as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

// Normalizing here would change the signed bytes of a received document.
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_canonical(&s).map_err(serde::de::Error::custom)
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
