//! Process-local series store.
//!
//! Mirrors the RedisTimeSeries behaviour the service relies on: samples are
//! kept ordered by timestamp, duplicate timestamps are rejected (the `BLOCK`
//! duplicate policy), and a missing series reads as empty. Auto-stamped
//! appends never collide: if the clock has not advanced past the newest
//! sample, the new reading is stamped one millisecond later.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use tempwatch_core::reading::{truncate_to_millis, Reading};
use tempwatch_core::types::Timestamp;

use crate::{RangeBound, SeriesStore, StoreError};

#[derive(Debug, Default)]
pub struct InMemorySeriesStore {
    series: RwLock<HashMap<String, Vec<Reading>>>,
    counters: RwLock<HashMap<String, i64>>,
}

impl InMemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeriesStore for InMemorySeriesStore {
    async fn append_reading(
        &self,
        series: &str,
        value: f64,
        timestamp: Option<Timestamp>,
    ) -> Result<Reading, StoreError> {
        let mut all = self.series.write().await;
        let samples = all.entry(series.to_string()).or_default();

        let timestamp = match timestamp {
            Some(ts) => truncate_to_millis(ts),
            None => {
                let now = truncate_to_millis(Utc::now());
                match samples.last() {
                    Some(last) if last.timestamp >= now => {
                        last.timestamp + Duration::milliseconds(1)
                    }
                    _ => now,
                }
            }
        };

        let idx = samples.partition_point(|r| r.timestamp < timestamp);
        if samples.get(idx).is_some_and(|r| r.timestamp == timestamp) {
            return Err(StoreError::Command(format!(
                "duplicate sample at {} in series {series}",
                timestamp.timestamp_millis()
            )));
        }

        let reading = Reading::new(timestamp, value);
        samples.insert(idx, reading);
        Ok(reading)
    }

    async fn sample_count(&self, series: &str) -> Result<usize, StoreError> {
        Ok(self.series.read().await.get(series).map_or(0, Vec::len))
    }

    async fn range_query(
        &self,
        series: &str,
        from: RangeBound,
        to: RangeBound,
    ) -> Result<Vec<Reading>, StoreError> {
        let all = self.series.read().await;
        let Some(samples) = all.get(series) else {
            return Ok(Vec::new());
        };
        let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
            return Ok(Vec::new());
        };

        let lo = from.resolve(first.timestamp, last.timestamp);
        let hi = to.resolve(first.timestamp, last.timestamp);
        Ok(samples
            .iter()
            .filter(|r| r.timestamp >= lo && r.timestamp <= hi)
            .copied()
            .collect())
    }

    async fn increment_counter(&self, key: &str) -> Result<i64, StoreError> {
        let mut counters = self.counters.write().await;
        let counter = counters.entry(key.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn at(millis: i64) -> Timestamp {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[tokio::test]
    async fn missing_series_is_empty() {
        let store = InMemorySeriesStore::new();
        assert_eq!(store.sample_count("temperature").await.unwrap(), 0);
        assert!(store
            .range_query("temperature", RangeBound::Earliest, RangeBound::Latest)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn readings_are_kept_in_timestamp_order() {
        let store = InMemorySeriesStore::new();
        store.append_reading("t", 3.0, Some(at(3_000))).await.unwrap();
        store.append_reading("t", 1.0, Some(at(1_000))).await.unwrap();
        store.append_reading("t", 2.0, Some(at(2_000))).await.unwrap();

        let values: Vec<f64> = store
            .range_query("t", RangeBound::Earliest, RangeBound::Latest)
            .await
            .unwrap()
            .iter()
            .map(|r| r.value)
            .collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        assert_eq!(store.sample_count("t").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn duplicate_timestamp_is_rejected() {
        let store = InMemorySeriesStore::new();
        store.append_reading("t", 1.0, Some(at(1_000))).await.unwrap();

        assert_matches!(
            store.append_reading("t", 2.0, Some(at(1_000))).await,
            Err(StoreError::Command(_))
        );
        assert_eq!(store.sample_count("t").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn auto_stamped_appends_never_collide() {
        let store = InMemorySeriesStore::new();
        for i in 0..50 {
            store.append_reading("t", f64::from(i), None).await.unwrap();
        }

        let readings = store
            .range_query("t", RangeBound::Earliest, RangeBound::Latest)
            .await
            .unwrap();
        assert_eq!(readings.len(), 50);
        assert!(readings.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[tokio::test]
    async fn range_bounds_are_inclusive() {
        let store = InMemorySeriesStore::new();
        for ms in [1_000, 2_000, 3_000, 4_000] {
            store.append_reading("t", ms as f64, Some(at(ms))).await.unwrap();
        }

        let readings = store
            .range_query("t", RangeBound::At(at(2_000)), RangeBound::At(at(3_000)))
            .await
            .unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].value, 2_000.0);
        assert_eq!(readings[1].value, 3_000.0);
    }

    #[tokio::test]
    async fn counters_start_at_one() {
        let store = InMemorySeriesStore::new();
        assert_eq!(store.increment_counter("counter").await.unwrap(), 1);
        assert_eq!(store.increment_counter("counter").await.unwrap(), 2);
        assert_eq!(store.increment_counter("other").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn symbolic_bounds_pin_to_end_samples() {
        let store = InMemorySeriesStore::new();
        for ms in [1_000, 2_000, 3_000] {
            store.append_reading("t", ms as f64, Some(at(ms))).await.unwrap();
        }

        let newest = store
            .range_query("t", RangeBound::Latest, RangeBound::Latest)
            .await
            .unwrap();
        assert_eq!(newest.len(), 1);
        assert_eq!(newest[0].value, 3_000.0);

        let oldest = store
            .range_query("t", RangeBound::Earliest, RangeBound::Earliest)
            .await
            .unwrap();
        assert_eq!(oldest.len(), 1);
        assert_eq!(oldest[0].value, 1_000.0);

        let tail = store
            .range_query("t", RangeBound::At(at(2_000)), RangeBound::Latest)
            .await
            .unwrap();
        assert_eq!(tail.len(), 2);

        assert!(store
            .range_query("t", RangeBound::Latest, RangeBound::At(at(2_000)))
            .await
            .unwrap()
            .is_empty());
    }
}
