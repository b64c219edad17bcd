//! Handlers for reading ingestion, listing and anomaly detection.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tempwatch_core::reading::Reading;
use tempwatch_core::scorer::{has_sufficient_history, score, ScoreResult};
use tempwatch_core::window::preceding_window;
use tempwatch_store::RangeBound;

use crate::error::AppResult;
use crate::query::ValueParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Classification of a reading submitted for detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Fewer than `window_size` prior readings; nothing was scored.
    InsufficientHistory,
    Normal,
    Anomalous,
}

/// Result of `POST /readings/detect`.
#[derive(Debug, Serialize)]
pub struct DetectionResponse {
    /// The reading as stored.
    pub reading: Reading,
    pub outcome: Outcome,
    pub threshold: f64,
    pub window_size: usize,
    /// Number of readings stored before this one.
    pub history: usize,
    /// Forecast and error, present once enough history exists.
    pub score: Option<ScoreResult>,
    /// Values the forecast was made from, oldest first.
    pub window: Option<Vec<f64>>,
}

/// Result of `GET /readings`.
#[derive(Debug, Serialize)]
pub struct ReadingList {
    /// Hostname of the instance that served the request.
    pub hostname: String,
    pub count: usize,
    pub readings: Vec<Reading>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /readings?value=
///
/// Append a reading stamped with the store's current time.
pub async fn append_reading(
    State(state): State<AppState>,
    Query(params): Query<ValueParams>,
) -> AppResult<(StatusCode, Json<DataResponse<Reading>>)> {
    let value = params.require()?;
    let reading = state
        .store
        .append_reading(&state.config.series_key, value, None)
        .await?;

    tracing::info!(value, timestamp = %reading.timestamp, "Reading stored");
    Ok((StatusCode::CREATED, Json(DataResponse { data: reading })))
}

/// GET /readings
///
/// List every stored reading, oldest first.
pub async fn list_readings(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ReadingList>>> {
    let readings = state
        .store
        .range_query(
            &state.config.series_key,
            RangeBound::Earliest,
            RangeBound::Latest,
        )
        .await?;

    Ok(Json(DataResponse {
        data: ReadingList {
            hostname: state.hostname.to_string(),
            count: readings.len(),
            readings,
        },
    }))
}

/// POST /readings/detect?value=
///
/// Append the reading, then score it against a forecast made from the
/// `window_size` readings that precede it.
pub async fn detect_anomaly(
    State(state): State<AppState>,
    Query(params): Query<ValueParams>,
) -> AppResult<Json<DataResponse<DetectionResponse>>> {
    let value = params.require()?;
    let series = state.config.series_key.as_str();
    let scoring = *state.scoring;

    let reading = state.store.append_reading(series, value, None).await?;

    let insufficient = |history: usize| DetectionResponse {
        reading,
        outcome: Outcome::InsufficientHistory,
        threshold: scoring.threshold,
        window_size: scoring.window_size,
        history,
        score: None,
        window: None,
    };

    // The count includes the reading just appended.
    let total = state.store.sample_count(series).await?;
    let history = total.saturating_sub(1);
    if !has_sufficient_history(history, scoring.window_size) {
        tracing::debug!(history, window_size = scoring.window_size, "Not enough history to score");
        return Ok(Json(DataResponse {
            data: insufficient(history),
        }));
    }

    let readings = state
        .store
        .range_query(series, RangeBound::Earliest, RangeBound::At(reading.timestamp))
        .await?;
    let Some(window) = preceding_window(&readings, reading.timestamp, scoring.window_size) else {
        // Samples expired or were removed between the count and the range query.
        let history = readings
            .iter()
            .filter(|r| r.timestamp < reading.timestamp)
            .count();
        return Ok(Json(DataResponse {
            data: insufficient(history),
        }));
    };

    let result = score(&window, value, state.model.as_ref(), &scoring)?;
    let outcome = if result.is_anomalous {
        tracing::warn!(
            observed = result.observed_value,
            predicted = result.predicted_value,
            error = result.absolute_error,
            threshold = scoring.threshold,
            "Anomalous reading detected"
        );
        Outcome::Anomalous
    } else {
        tracing::debug!(
            observed = result.observed_value,
            predicted = result.predicted_value,
            error = result.absolute_error,
            "Reading within threshold"
        );
        Outcome::Normal
    };

    Ok(Json(DataResponse {
        data: DetectionResponse {
            reading,
            outcome,
            threshold: scoring.threshold,
            window_size: scoring.window_size,
            history,
            score: Some(result),
            window: Some(window),
        },
    }))
}
