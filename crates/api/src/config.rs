use crate::auth::jwt::JwtConfig;

/// Default interval between retention runs, in seconds.
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 3600;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
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
    /// Whether task history is guarded by the monitoring capability instead
    /// of the root capability (default: `false`).
    pub advanced_permissions_enabled: bool,
    /// Retention settings for the task history table.
    pub task_history: TaskHistoryConfig,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

/// Retention settings for the task history table.
#[derive(Debug, Clone)]
pub struct TaskHistoryConfig {
    /// Number of most recent rows kept by cleanup.
    pub max_rows: u64,
    /// Seconds between scheduled cleanup runs.
    pub cleanup_interval_secs: u64,
}

impl Default for TaskHistoryConfig {
    fn default() -> Self {
        Self {
            max_rows: taskhist_core::task_history::DEFAULT_MAX_ROWS,
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                              | Default                 |
    /// |--------------------------------------|-------------------------|
    /// | `HOST`                               | `0.0.0.0`               |
    /// | `PORT`                               | `3000`                  |
    /// | `CORS_ORIGINS`                       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`               | `30`                    |
    /// | `ADVANCED_PERMISSIONS_ENABLED`       | `false`                 |
    /// | `TASK_HISTORY_MAX_ROWS`              | `100000`                |
    /// | `TASK_HISTORY_CLEANUP_INTERVAL_SECS` | `3600`                  |
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but cannot be parsed, or if the JWT
    /// settings are invalid (see [`JwtConfig::from_env`]).
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let advanced_permissions_enabled: bool = std::env::var("ADVANCED_PERMISSIONS_ENABLED")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("ADVANCED_PERMISSIONS_ENABLED must be `true` or `false`");

        let defaults = TaskHistoryConfig::default();

        let max_rows: u64 = std::env::var("TASK_HISTORY_MAX_ROWS")
            .unwrap_or_else(|_| defaults.max_rows.to_string())
            .parse()
            .expect("TASK_HISTORY_MAX_ROWS must be a valid u64");

        let cleanup_interval_secs: u64 = std::env::var("TASK_HISTORY_CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|_| defaults.cleanup_interval_secs.to_string())
            .parse()
            .expect("TASK_HISTORY_CLEANUP_INTERVAL_SECS must be a valid u64");
        assert!(
            cleanup_interval_secs > 0,
            "TASK_HISTORY_CLEANUP_INTERVAL_SECS must be positive"
        );

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            advanced_permissions_enabled,
            task_history: TaskHistoryConfig {
                max_rows,
                cleanup_interval_secs,
            },
            jwt,
        }
    }
}
