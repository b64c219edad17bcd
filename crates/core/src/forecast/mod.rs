//! One-step-ahead forecasters.
//!
//! The scorer only sees the [`Forecaster`] capability: a window of values in,
//! one predicted value out. Concrete pre-trained models are deserialized from
//! a JSON model file whose `"kind"` field selects the architecture:
//!
//! ```json
//! { "kind": "linear", "coefficients": [0.1, 0.2, 0.7], "intercept": 0.0 }
//! ```
//!
//! Training is out of scope; the weights are produced elsewhere.

pub mod linear;
pub mod lstm;

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::ScoringConfig;
use crate::error::CoreError;

pub use linear::LinearModel;
pub use lstm::LstmModel;

/// Error raised by a forecaster that could not produce a prediction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ForecastError(pub String);

/// A deterministic one-step-ahead predictor.
///
/// Implementations hold fixed internal state (trained weights) and must not
/// mutate it during prediction, so a single instance can be shared across
/// concurrent requests behind an `Arc`.
pub trait Forecaster: Send + Sync {
    /// Predict the value that follows `window` (oldest value first).
    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError>;

    /// Input length the model was trained for, if it pins one.
    fn input_len(&self) -> Option<usize> {
        None
    }

    /// Short architecture name for logs and health output.
    fn kind(&self) -> &'static str;
}

impl std::fmt::Debug for dyn Forecaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forecaster")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

/// On-disk model description, tagged by `"kind"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelFile {
    Lstm(LstmModel),
    Linear(LinearModel),
}

impl ModelFile {
    /// Validate the weights and turn the description into a shareable forecaster.
    pub fn into_forecaster(self) -> Result<Arc<dyn Forecaster>, CoreError> {
        match self {
            ModelFile::Lstm(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
            ModelFile::Linear(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
        }
    }
}

/// Parse a model from its JSON text.
pub fn parse_model(json: &str) -> Result<Arc<dyn Forecaster>, CoreError> {
    let file: ModelFile = serde_json::from_str(json)
        .map_err(|e| CoreError::Validation(format!("malformed model file: {e}")))?;
    file.into_forecaster()
}

/// Load a pre-trained model from `path`.
///
/// Every failure is reported as [`CoreError::Load`] naming the file.
pub fn load_model(path: impl AsRef<Path>) -> Result<Arc<dyn Forecaster>, CoreError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| CoreError::load(path, e))?;
    let model = parse_model(&text).map_err(|e| CoreError::load(path, e))?;
    tracing::debug!(
        path = %path.display(),
        kind = model.kind(),
        input_len = ?model.input_len(),
        "Loaded forecasting model"
    );
    Ok(model)
}

/// Check that a model accepts the configured window length.
///
/// Models that pin their input length must agree with `window_size`; the
/// window size is fixed once both files are loaded.
pub fn ensure_compatible(model: &dyn Forecaster, config: &ScoringConfig) -> Result<(), CoreError> {
    match model.input_len() {
        Some(len) if len != config.window_size => Err(CoreError::Validation(format!(
            "{} model expects {len} readings but window_size is {}",
            model.kind(),
            config.window_size
        ))),
        _ => Ok(()),
    }
}

/// Reject weight vectors containing NaN or infinities.
pub(crate) fn ensure_finite(name: &str, values: &[f64]) -> Result<(), CoreError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{name} contains non-finite weights"
        )))
    }
}
