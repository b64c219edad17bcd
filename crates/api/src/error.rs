use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tempwatch_core::error::CoreError;
use tempwatch_store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`StoreError`] for series store
/// failures, and adds a request-level variant. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tempwatch_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A series store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::ModelInference(msg) => {
                    tracing::error!(error = %msg, "Model inference failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "MODEL_INFERENCE_ERROR",
                        "The forecasting model failed to produce a prediction".to_string(),
                    )
                }
                CoreError::Load { .. } => {
                    tracing::error!(error = %core, "Load error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Timeouts map to 504.
/// - Everything else maps to 502: the failure is upstream of this service.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %err, "Series store error");
    match err {
        StoreError::Timeout(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            "STORE_TIMEOUT",
            "The series store did not respond in time".to_string(),
        ),
        StoreError::Connection(_) | StoreError::Command(_) | StoreError::Decode(_) => (
            StatusCode::BAD_GATEWAY,
            "STORE_ERROR",
            "The series store request failed".to_string(),
        ),
    }
}
