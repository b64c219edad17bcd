#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use tempwatch_api::config::ServerConfig;
use tempwatch_api::router::build_app_router;
use tempwatch_api::state::AppState;
use tempwatch_core::config::ScoringConfig;
use tempwatch_core::forecast::{ForecastError, Forecaster};
use tempwatch_core::reading::Reading;
use tempwatch_core::types::Timestamp;
use tempwatch_store::{InMemorySeriesStore, RangeBound, SeriesStore, StoreError};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        redis_url: "redis://127.0.0.1:6379/0".to_string(),
        redis_timeout_ms: 2000,
        series_key: "temperature".to_string(),
        visits_key: "counter".to_string(),
        model_path: "unused.json".to_string(),
        model_config_path: "unused.json".to_string(),
        service_name: "tempwatch".to_string(),
    }
}

/// Forecaster that always predicts the same value.
pub struct FixedForecaster(pub f64);

impl Forecaster for FixedForecaster {
    fn predict(&self, _window: &[f64]) -> Result<f64, ForecastError> {
        Ok(self.0)
    }

    fn kind(&self) -> &'static str {
        "fixed"
    }
}

/// Forecaster that always fails.
pub struct BrokenForecaster;

impl Forecaster for BrokenForecaster {
    fn predict(&self, _window: &[f64]) -> Result<f64, ForecastError> {
        Err(ForecastError("weights corrupted".to_string()))
    }

    fn kind(&self) -> &'static str {
        "broken"
    }
}

/// Store whose every command fails as if Redis were down.
pub struct UnreachableStore;

fn refused() -> StoreError {
    StoreError::Connection("connection refused".to_string())
}

#[async_trait]
impl SeriesStore for UnreachableStore {
    async fn append_reading(
        &self,
        _series: &str,
        _value: f64,
        _timestamp: Option<Timestamp>,
    ) -> Result<Reading, StoreError> {
        Err(refused())
    }

    async fn sample_count(&self, _series: &str) -> Result<usize, StoreError> {
        Err(refused())
    }

    async fn range_query(
        &self,
        _series: &str,
        _from: RangeBound,
        _to: RangeBound,
    ) -> Result<Vec<Reading>, StoreError> {
        Err(refused())
    }

    async fn increment_counter(&self, _key: &str) -> Result<i64, StoreError> {
        Err(refused())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(refused())
    }
}

/// Build the full application router over the given store and model.
///
/// Uses the same builder as `main.rs` so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery).
pub fn build_test_app(
    store: Arc<dyn SeriesStore>,
    model: Arc<dyn Forecaster>,
    scoring: ScoringConfig,
) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        model,
        scoring: Arc::new(scoring),
        config: Arc::new(config.clone()),
        hostname: "test-host".into(),
    };
    build_app_router(state, &config)
}

/// App over an in-memory store with a forecaster fixed at `prediction`,
/// threshold 1.5 and a 10-reading window.
pub fn default_app(store: Arc<InMemorySeriesStore>, prediction: f64) -> Router {
    build_test_app(
        store,
        Arc::new(FixedForecaster(prediction)),
        ScoringConfig::new(1.5, 10).unwrap(),
    )
}

/// Send a request with an empty body.
pub async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
