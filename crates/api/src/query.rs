//! Shared query parameter types for API handlers.

use serde::Deserialize;

use crate::error::AppError;

/// `?value=` carrying a new temperature reading.
///
/// Kept as raw text so a malformed number is reported through [`AppError`]
/// rather than the `Query` extractor's plain-text rejection.
#[derive(Debug, Deserialize)]
pub struct ValueParams {
    pub value: Option<String>,
}

impl ValueParams {
    /// The reading value, which must be present, numeric and finite.
    pub fn require(&self) -> Result<f64, AppError> {
        let raw = self.value.as_deref().map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(AppError::BadRequest(
                "the 'value' query parameter is required and must be a float".to_string(),
            ));
        }

        let value: f64 = raw
            .parse()
            .map_err(|_| AppError::BadRequest(format!("value must be a float, got {raw:?}")))?;
        if !value.is_finite() {
            return Err(AppError::BadRequest(format!(
                "value must be a finite number, got {value}"
            )));
        }
        Ok(value)
    }
}
