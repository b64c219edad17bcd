//! Scoring configuration shipped alongside the trained model.
//!
//! The file is a small JSON object, e.g.
//!
//! ```json
//! { "threshold": 1.5, "window_size": 10 }
//! ```
//!
//! It is loaded once at startup and shared read-only for the process
//! lifetime.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Window length used when the config file does not set one.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Anomaly threshold and window length for the loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Maximum tolerated absolute prediction error.
    pub threshold: f64,
    /// Number of prior readings fed to the forecaster.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

impl ScoringConfig {
    /// Build a validated config.
    pub fn new(threshold: f64, window_size: usize) -> Result<Self, CoreError> {
        let config = Self {
            threshold,
            window_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the threshold is a finite non-negative number and the
    /// window holds at least one reading.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.window_size == 0 {
            return Err(CoreError::Validation(
                "window_size must be greater than 0".to_string(),
            ));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(CoreError::Validation(format!(
                "threshold must be a finite non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Parse and validate a scoring config from its JSON text.
pub fn parse_config(json: &str) -> Result<ScoringConfig, CoreError> {
    let config: ScoringConfig = serde_json::from_str(json)
        .map_err(|e| CoreError::Validation(format!("malformed scoring config: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Read the scoring config from `path`.
///
/// Every failure (missing file, malformed JSON, invalid values) is reported
/// as [`CoreError::Load`] naming the file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ScoringConfig, CoreError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| CoreError::load(path, e))?;
    let config = parse_config(&text).map_err(|e| CoreError::load(path, e))?;
    tracing::debug!(
        path = %path.display(),
        threshold = config.threshold,
        window_size = config.window_size,
        "Loaded scoring config"
    );
    Ok(config)
}
