//! RedisTimeSeries-backed series store.
//!
//! Commands used:
//!
//! ```text
//! TS.ADD   <series> <*|millis> <value>   append, returns the stored timestamp
//! TS.INFO  <series>                      flat key/value reply, `totalSamples`
//! TS.RANGE <series> <-|millis> <+|millis>  [[millis, "value"], ...]
//! INCR     <key>                         visit counter
//! PING
//! ```
//!
//! A connection is established per command through the multiplexed async
//! client, so the service starts (and reports itself degraded) even when
//! Redis is down. Every round trip, including connecting, is bounded by the
//! configured timeout.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{FromRedisValue, RedisError, Value};

use tempwatch_core::reading::Reading;
use tempwatch_core::types::Timestamp;

use crate::{RangeBound, SeriesStore, StoreError};

/// Field of the `TS.INFO` reply holding the sample count.
const TOTAL_SAMPLES_FIELD: &str = "totalSamples";

pub struct RedisSeriesStore {
    client: redis::Client,
    timeout: Duration,
}

impl RedisSeriesStore {
    /// Create a store for the given `redis://` URL. Does not connect yet.
    pub fn open(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(StoreError::from)?;
        Ok(Self { client, timeout })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        match tokio::time::timeout(self.timeout, self.client.get_multiplexed_async_connection())
            .await
        {
            Ok(conn) => conn.map_err(|e| StoreError::Connection(e.to_string())),
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }

    async fn query<T: FromRedisValue>(&self, cmd: &redis::Cmd) -> Result<T, StoreError> {
        let mut conn = self.connection().await?;
        match tokio::time::timeout(self.timeout, cmd.query_async(&mut conn)).await {
            Ok(reply) => {
                let value: T = reply?;
                Ok(value)
            }
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }
}

impl From<RedisError> for StoreError {
    fn from(err: RedisError) -> Self {
        if err.is_io_error()
            || err.is_timeout()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
        {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Command(err.to_string())
        }
    }
}

/// RedisTimeSeries answers `ERR TSDB: the key does not exist` for a series
/// that has never been written.
fn is_missing_series(err: &StoreError) -> bool {
    matches!(err, StoreError::Command(msg) if msg.contains("does not exist"))
}

fn bound_arg(bound: RangeBound) -> String {
    match bound {
        RangeBound::Earliest => "-".to_string(),
        RangeBound::Latest => "+".to_string(),
        RangeBound::At(ts) => ts.timestamp_millis().to_string(),
    }
}

/// Extract `totalSamples` from a flat `TS.INFO` reply.
fn parse_total_samples(info: &[Value]) -> Result<usize, StoreError> {
    for pair in info.chunks(2) {
        let [key, value] = pair else { break };
        let Ok(name) = String::from_redis_value(key) else {
            continue;
        };
        if name == TOTAL_SAMPLES_FIELD {
            let count = i64::from_redis_value(value)
                .map_err(|e| StoreError::Decode(format!("{TOTAL_SAMPLES_FIELD}: {e}")))?;
            return usize::try_from(count)
                .map_err(|_| StoreError::Decode(format!("negative sample count {count}")));
        }
    }
    Err(StoreError::Decode(format!(
        "TS.INFO reply has no {TOTAL_SAMPLES_FIELD} field"
    )))
}

/// Convert `TS.RANGE` samples into readings.
fn parse_samples(samples: Vec<(i64, String)>) -> Result<Vec<Reading>, StoreError> {
    samples
        .into_iter()
        .map(|(millis, raw)| {
            let value: f64 = raw
                .trim()
                .parse()
                .map_err(|_| StoreError::Decode(format!("sample value {raw:?} is not a float")))?;
            Reading::from_millis(millis, value)
                .ok_or_else(|| StoreError::Decode(format!("sample timestamp {millis} out of range")))
        })
        .collect()
}

#[async_trait]
impl SeriesStore for RedisSeriesStore {
    async fn append_reading(
        &self,
        series: &str,
        value: f64,
        timestamp: Option<Timestamp>,
    ) -> Result<Reading, StoreError> {
        let mut cmd = redis::cmd("TS.ADD");
        cmd.arg(series);
        match timestamp {
            Some(ts) => cmd.arg(ts.timestamp_millis()),
            None => cmd.arg("*"),
        };
        cmd.arg(value);

        let stored_at: i64 = self.query(&cmd).await?;
        tracing::debug!(series, value, stored_at, "Appended reading");
        Reading::from_millis(stored_at, value)
            .ok_or_else(|| StoreError::Decode(format!("TS.ADD returned timestamp {stored_at}")))
    }

    async fn sample_count(&self, series: &str) -> Result<usize, StoreError> {
        let mut cmd = redis::cmd("TS.INFO");
        cmd.arg(series);
        match self.query::<Vec<Value>>(&cmd).await {
            Ok(info) => parse_total_samples(&info),
            Err(e) if is_missing_series(&e) => Ok(0),
            Err(e) => Err(e),
        }
    }

    async fn range_query(
        &self,
        series: &str,
        from: RangeBound,
        to: RangeBound,
    ) -> Result<Vec<Reading>, StoreError> {
        let mut cmd = redis::cmd("TS.RANGE");
        cmd.arg(series).arg(bound_arg(from)).arg(bound_arg(to));
        match self.query::<Vec<(i64, String)>>(&cmd).await {
            Ok(samples) => parse_samples(samples),
            Err(e) if is_missing_series(&e) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn increment_counter(&self, key: &str) -> Result<i64, StoreError> {
        let mut cmd = redis::cmd("INCR");
        cmd.arg(key);
        self.query(&cmd).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let _: String = self.query(&redis::cmd("PING")).await?;
        Ok(())
    }
}
