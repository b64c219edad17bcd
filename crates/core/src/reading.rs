//! A single stored temperature measurement.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// One sample of a series.
///
/// Readings are immutable once stored and ordered by `timestamp` inside
/// their series. Timestamps carry millisecond precision, which is what the
/// time-series store keeps.
///
/// Serializes as `{ timestamp, millis, value }`: the RFC 3339 timestamp plus
/// the raw epoch milliseconds the store keys samples by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "ReadingRecord")]
pub struct Reading {
    pub timestamp: Timestamp,
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Build a reading from an epoch-milliseconds timestamp.
    ///
    /// Returns `None` if the timestamp is out of chrono's representable range.
    pub fn from_millis(millis: i64, value: f64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis)
            .single()
            .map(|timestamp| Self { timestamp, value })
    }

    /// Timestamp as epoch milliseconds.
    pub fn millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

#[derive(Serialize)]
struct ReadingRecord {
    timestamp: Timestamp,
    millis: i64,
    value: f64,
}

impl From<Reading> for ReadingRecord {
    fn from(reading: Reading) -> Self {
        Self {
            timestamp: reading.timestamp,
            millis: reading.millis(),
            value: reading.value,
        }
    }
}

/// Truncate a timestamp to millisecond precision.
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ts.timestamp_millis())
        .single()
        .unwrap_or(ts)
}
