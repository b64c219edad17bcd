//! Window extraction from a range-queried series.

use crate::reading::Reading;
use crate::types::Timestamp;

/// Values of the last `window_size` readings strictly before `observed_at`,
/// oldest first.
///
/// `readings` must be ordered by timestamp, as the series store returns them.
/// Returns `None` when fewer than `window_size` such readings exist.
pub fn preceding_window(
    readings: &[Reading],
    observed_at: Timestamp,
    window_size: usize,
) -> Option<Vec<f64>> {
    let prior = readings.partition_point(|r| r.timestamp < observed_at);
    if prior < window_size {
        return None;
    }
    Some(
        readings[prior - window_size..prior]
            .iter()
            .map(|r| r.value)
            .collect(),
    )
}
