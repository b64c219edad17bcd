//! Time-series storage for readings.
//!
//! [`SeriesStore`] is the command interface the API layer talks to. Two
//! backends implement it:
//!
//! - [`RedisSeriesStore`]: RedisTimeSeries (`TS.ADD`, `TS.INFO`, `TS.RANGE`).
//! - [`InMemorySeriesStore`]: process-local, for tests and local development.

pub mod memory;
pub mod redis_ts;

use std::time::Duration;

use async_trait::async_trait;
use tempwatch_core::reading::Reading;
use tempwatch_core::types::Timestamp;

pub use memory::InMemorySeriesStore;
pub use redis_ts::RedisSeriesStore;

/// Errors raised by a series store. Propagated unchanged to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Store command failed: {0}")]
    Command(String),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected store reply: {0}")]
    Decode(String),
}

/// One end of a range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    /// The oldest sample in the series.
    Earliest,
    /// The newest sample in the series.
    Latest,
    /// An inclusive timestamp bound.
    At(Timestamp),
}

impl RangeBound {
    /// Concrete timestamp this bound stands for in a series whose oldest and
    /// newest samples are `first` and `last`.
    ///
    /// `Earliest` and `Latest` pin to those samples wherever they appear, so
    /// `Latest..Latest` selects only the newest sample, as `TS.RANGE key + +`
    /// does.
    pub fn resolve(&self, first: Timestamp, last: Timestamp) -> Timestamp {
        match self {
            RangeBound::Earliest => first,
            RangeBound::Latest => last,
            RangeBound::At(ts) => *ts,
        }
    }
}

/// Append-only, timestamp-ordered storage of readings, one series per key.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// Append `value` to `series`. With `timestamp: None` the store stamps
    /// the reading with its current time. Returns the stored reading.
    async fn append_reading(
        &self,
        series: &str,
        value: f64,
        timestamp: Option<Timestamp>,
    ) -> Result<Reading, StoreError>;

    /// Total number of samples in `series` (0 if the series does not exist).
    async fn sample_count(&self, series: &str) -> Result<usize, StoreError>;

    /// Readings between `from` and `to` (inclusive), oldest first.
    async fn range_query(
        &self,
        series: &str,
        from: RangeBound,
        to: RangeBound,
    ) -> Result<Vec<Reading>, StoreError>;

    /// Increment a plain counter and return its new value.
    async fn increment_counter(&self, key: &str) -> Result<i64, StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
