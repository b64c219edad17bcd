//! Single-layer LSTM followed by a one-unit dense head.
//!
//! Weight layout follows Keras: the four gate blocks are concatenated in the
//! order input, forget, cell, output, so every gate row has `4 * units`
//! entries.
//!
//! | Field              | Shape              |
//! |--------------------|--------------------|
//! | `kernel`           | `1 x 4*units`      |
//! | `recurrent_kernel` | `units x 4*units`  |
//! | `bias`             | `4*units`          |
//! | `dense_kernel`     | `units`            |
//! | `dense_bias`       | scalar             |

use serde::Deserialize;

use super::{ensure_finite, ForecastError, Forecaster};
use crate::error::CoreError;

/// Pre-trained LSTM forecaster with one input feature per timestep.
#[derive(Debug, Clone, Deserialize)]
pub struct LstmModel {
    units: usize,
    /// Sequence length the model was trained on. Any length is accepted when unset.
    #[serde(default)]
    sequence_length: Option<usize>,
    kernel: Vec<Vec<f64>>,
    recurrent_kernel: Vec<Vec<f64>>,
    bias: Vec<f64>,
    dense_kernel: Vec<f64>,
    #[serde(default)]
    dense_bias: f64,
}

impl LstmModel {
    /// Build a model from raw weights. Call sites outside deserialization
    /// should run [`Forecaster::predict`] only after a successful `validate`.
    pub fn new(
        units: usize,
        sequence_length: Option<usize>,
        kernel: Vec<f64>,
        recurrent_kernel: Vec<Vec<f64>>,
        bias: Vec<f64>,
        dense_kernel: Vec<f64>,
        dense_bias: f64,
    ) -> Self {
        Self {
            units,
            sequence_length,
            kernel: vec![kernel],
            recurrent_kernel,
            bias,
            dense_kernel,
            dense_bias,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        let units = self.units;
        if units == 0 {
            return Err(CoreError::Validation(
                "lstm model needs at least one unit".to_string(),
            ));
        }
        let gates = units.checked_mul(4).ok_or_else(|| {
            CoreError::Validation(format!("lstm model has too many units ({units})"))
        })?;
        if self.sequence_length == Some(0) {
            return Err(CoreError::Validation(
                "sequence_length must be greater than 0".to_string(),
            ));
        }
        if self.kernel.len() != 1 || self.kernel[0].len() != gates {
            return Err(shape_error("kernel", &format!("1 x {gates}")));
        }
        if self.recurrent_kernel.len() != units
            || self.recurrent_kernel.iter().any(|row| row.len() != gates)
        {
            return Err(shape_error("recurrent_kernel", &format!("{units} x {gates}")));
        }
        if self.bias.len() != gates {
            return Err(shape_error("bias", &gates.to_string()));
        }
        if self.dense_kernel.len() != units {
            return Err(shape_error("dense_kernel", &units.to_string()));
        }

        ensure_finite("kernel", &self.kernel[0])?;
        for row in &self.recurrent_kernel {
            ensure_finite("recurrent_kernel", row)?;
        }
        ensure_finite("bias", &self.bias)?;
        ensure_finite("dense_kernel", &self.dense_kernel)?;
        ensure_finite("dense_bias", &[self.dense_bias])
    }

    /// Advance the cell by one timestep, updating `h` and `c` in place.
    fn step(&self, x: f64, h: &mut [f64], c: &mut [f64]) {
        let units = self.units;
        let kernel = &self.kernel[0];

        // z = x * W + h * U + b
        let mut z: Vec<f64> = kernel
            .iter()
            .zip(&self.bias)
            .map(|(w, b)| x * w + b)
            .collect();
        for (h_j, row) in h.iter().zip(&self.recurrent_kernel) {
            for (z_k, u) in z.iter_mut().zip(row) {
                *z_k += h_j * u;
            }
        }

        for j in 0..units {
            let input = sigmoid(z[j]);
            let forget = sigmoid(z[units + j]);
            let candidate = z[2 * units + j].tanh();
            let output = sigmoid(z[3 * units + j]);

            c[j] = forget * c[j] + input * candidate;
            h[j] = output * c[j].tanh();
        }
    }
}

fn shape_error(field: &str, expected: &str) -> CoreError {
    CoreError::Validation(format!("{field} must have shape {expected}"))
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Forecaster for LstmModel {
    fn predict(&self, window: &[f64]) -> Result<f64, ForecastError> {
        if window.is_empty() {
            return Err(ForecastError("empty input sequence".to_string()));
        }
        if let Some(expected) = self.sequence_length {
            if window.len() != expected {
                return Err(ForecastError(format!(
                    "expected sequence of {expected} steps, got {}",
                    window.len()
                )));
            }
        }

        let mut h = vec![0.0; self.units];
        let mut c = vec![0.0; self.units];
        for &x in window {
            self.step(x, &mut h, &mut c);
        }

        let prediction = self
            .dense_kernel
            .iter()
            .zip(&h)
            .map(|(w, h_j)| w * h_j)
            .sum::<f64>()
            + self.dense_bias;
        Ok(prediction)
    }

    fn input_len(&self) -> Option<usize> {
        self.sequence_length
    }

    fn kind(&self) -> &'static str {
        "lstm"
    }
}
