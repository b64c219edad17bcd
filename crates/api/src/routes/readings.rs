//! Route definitions for reading endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::readings;
use crate::state::AppState;

/// Routes mounted at `/readings`.
///
/// ```text
/// GET  /          -> list_readings
/// POST /          -> append_reading
/// POST /detect    -> detect_anomaly
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(readings::list_readings).post(readings::append_reading),
        )
        .route("/detect", post(readings::detect_anomaly))
}
