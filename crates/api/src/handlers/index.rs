//! Landing page handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Available endpoints listed on the landing page.
const ENDPOINTS: [&str; 4] = [
    "POST /api/v1/readings?value=VALUE",
    "POST /api/v1/readings/detect?value=VALUE",
    "GET /api/v1/readings",
    "GET /health",
];

const COUNTER_UNAVAILABLE: &str = "visit counter disabled: the series store is unreachable";

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub hostname: String,
    /// Visit count, or `None` when the store is unreachable.
    pub visits: Option<i64>,
    /// Why `visits` is missing, if it is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
    pub endpoints: Vec<&'static str>,
}

/// GET /
///
/// Greets the caller and bumps the visit counter. A store failure disables
/// the counter instead of failing the request.
pub async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    let (visits, note) = match state.store.increment_counter(&state.config.visits_key).await {
        Ok(count) => (Some(count), None),
        Err(e) => {
            tracing::warn!(error = %e, "Visit counter unavailable");
            (None, Some(COUNTER_UNAVAILABLE))
        }
    };

    Json(IndexResponse {
        message: format!("Welcome to {}!", state.config.service_name),
        hostname: state.hostname.to_string(),
        visits,
        note,
        endpoints: ENDPOINTS.to_vec(),
    })
}
