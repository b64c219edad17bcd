pub mod health;
pub mod readings;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Root-level routes (landing page).
pub fn root_router() -> Router<AppState> {
    Router::new().route("/", get(handlers::index::index))
}

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /readings                 list (GET), append (POST ?value=)
/// /readings/detect          append and score (POST ?value=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/readings", readings::router())
}
