use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tempwatch_api::config::ServerConfig;
use tempwatch_api::router::build_app_router;
use tempwatch_api::state::AppState;
use tempwatch_core::config::load_config;
use tempwatch_core::forecast::{ensure_compatible, load_model};
use tempwatch_store::{RedisSeriesStore, SeriesStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Model ---
    let scoring = load_config(&config.model_config_path).expect("Failed to load scoring config");
    let model = load_model(&config.model_path).expect("Failed to load forecasting model");
    ensure_compatible(model.as_ref(), &scoring).expect("Model does not match scoring config");
    tracing::info!(
        model = model.kind(),
        threshold = scoring.threshold,
        window_size = scoring.window_size,
        "Model and threshold loaded"
    );

    // --- Series store ---
    let store = RedisSeriesStore::open(&config.redis_url, config.redis_timeout())
        .expect("Invalid REDIS_URL");
    match store.ping().await {
        Ok(()) => tracing::info!("Series store reachable"),
        Err(e) => tracing::warn!(error = %e, "Series store unreachable, starting degraded"),
    }

    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());

    // --- App state ---
    let state = AppState {
        store: Arc::new(store),
        model,
        scoring: Arc::new(scoring),
        config: Arc::new(config.clone()),
        hostname: hostname.into(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tempwatch_api=debug,tempwatch_core=debug,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
