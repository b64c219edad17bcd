use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// RedisTimeSeries connection URL.
    pub redis_url: String,
    /// Per-command store timeout in milliseconds (default: `2000`).
    pub redis_timeout_ms: u64,
    /// Key of the series readings are appended to.
    pub series_key: String,
    /// Key of the index page visit counter.
    pub visits_key: String,
    /// Path of the serialized forecasting model.
    pub model_path: String,
    /// Path of the scoring config (threshold, window size).
    pub model_config_path: String,
    /// Name shown in the index page greeting.
    pub service_name: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                      |
    /// |------------------------|------------------------------|
    /// | `HOST`                 | `0.0.0.0`                    |
    /// | `PORT`                 | `3000`                       |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                         |
    /// | `REDIS_URL`            | `redis://localhost:6379/0`   |
    /// | `REDIS_TIMEOUT_MS`     | `2000`                       |
    /// | `SERIES_KEY`           | `temperature`                |
    /// | `VISITS_KEY`           | `counter`                    |
    /// | `MODEL_PATH`           | `lstm-model.json`            |
    /// | `MODEL_CONFIG_PATH`    | `config-lstm-model.json`     |
    /// | `NAME`                 | `world`                      |
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let redis_timeout_ms: u64 = env_or("REDIS_TIMEOUT_MS", "2000")
            .parse()
            .expect("REDIS_TIMEOUT_MS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            redis_url: env_or("REDIS_URL", "redis://localhost:6379/0"),
            redis_timeout_ms,
            series_key: env_or("SERIES_KEY", "temperature"),
            visits_key: env_or("VISITS_KEY", "counter"),
            model_path: env_or("MODEL_PATH", "lstm-model.json"),
            model_config_path: env_or("MODEL_CONFIG_PATH", "config-lstm-model.json"),
            service_name: env_or("NAME", "world"),
        }
    }

    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}
