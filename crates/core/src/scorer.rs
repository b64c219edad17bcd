//! Anomaly scoring by one-step-ahead forecast error.
//!
//! Pure logic: the caller fetches the window from the series store, checks
//! [`has_sufficient_history`] and passes the values in together with the
//! loaded model and config.

use serde::Serialize;

use crate::config::ScoringConfig;
use crate::error::CoreError;
use crate::forecast::Forecaster;

/// Outcome of scoring one observed reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    pub predicted_value: f64,
    pub observed_value: f64,
    pub absolute_error: f64,
    pub is_anomalous: bool,
}

/// Whether enough prior readings exist to fill a window.
pub fn has_sufficient_history(total_samples: usize, window_size: usize) -> bool {
    total_samples >= window_size
}

/// Classify `observed` against the model's forecast over `window`.
///
/// `window` holds exactly `config.window_size` values, oldest first. A reading
/// is anomalous when the absolute forecast error is strictly greater than the
/// threshold.
///
/// Fails with [`CoreError::InvalidInput`] (without invoking the model) on a
/// window length mismatch, and with [`CoreError::ModelInference`] when the
/// model errors or returns a non-finite value.
pub fn score(
    window: &[f64],
    observed: f64,
    model: &dyn Forecaster,
    config: &ScoringConfig,
) -> Result<ScoreResult, CoreError> {
    if window.len() != config.window_size {
        return Err(CoreError::InvalidInput(format!(
            "window has {} readings, expected {}",
            window.len(),
            config.window_size
        )));
    }

    let predicted_value = model
        .predict(window)
        .map_err(|e| CoreError::ModelInference(e.to_string()))?;
    if !predicted_value.is_finite() {
        return Err(CoreError::ModelInference(format!(
            "{} model returned non-finite prediction {predicted_value}",
            model.kind()
        )));
    }

    let absolute_error = (predicted_value - observed).abs();
    Ok(ScoreResult {
        predicted_value,
        observed_value: observed,
        absolute_error,
        is_anomalous: absolute_error > config.threshold,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
