//! Linear autoregressive forecaster.

use serde::Deserialize;

use super::{ensure_finite, ForecastError, Forecaster};
use crate::error::CoreError;

/// `intercept + Σ coefficients[k] * window[k]`, oldest value first.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    #[serde(default)]
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        if self.coefficients.is_empty() {
            return Err(CoreError::Validation(
                "linear model needs at least one coefficient".to_string(),
            ));
        }
        ensure_finite("coefficients", &self.coefficients)?;
        ensure_finite("intercept", &[self.intercept])
    }
}

impl Forecaster for LinearModel {
    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError> {
        if window.len() != self.coefficients.len() {
            return Err(ForecastError(format!(
                "expected {} inputs, got {}",
                self.coefficients.len(),
                window.len()
            )));
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(window)
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }

    fn input_len(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}
