use std::sync::Arc;

use tempwatch_core::config::ScoringConfig;
use tempwatch_core::forecast::Forecaster;
use tempwatch_store::SeriesStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The model and
/// scoring config are built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Time-series store readings are appended to and queried from.
    pub store: Arc<dyn SeriesStore>,
    /// Pre-trained one-step-ahead forecaster.
    pub model: Arc<dyn Forecaster>,
    /// Threshold and window size that go with `model`.
    pub scoring: Arc<ScoringConfig>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Hostname of the serving process, resolved once at startup.
    pub hostname: Arc<str>,
}
