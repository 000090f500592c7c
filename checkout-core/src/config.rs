use std::path::PathBuf;

/// Core configuration - everything env-var driven with defaults
///
/// | Environment variable | Default | Purpose |
/// |----------------------|---------|---------|
/// | CHECKOUT_WORK_DIR | /var/lib/checkout | offline store + logs |
/// | REMOTE_STORE_URL | http://localhost:54321 | remote row-store base URL |
/// | REMOTE_STORE_API_KEY | (empty) | API key for the remote store |
/// | REQUEST_TIMEOUT_MS | 30000 | remote request timeout |
/// | LOG_DIR | (none) | daily-rolling log files when set |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the redb offline store
    pub work_dir: String,
    /// Base URL of the remote row store
    pub remote_url: String,
    /// API key sent on every remote request
    pub remote_api_key: String,
    /// Remote request timeout (milliseconds)
    pub request_timeout_ms: u64,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("CHECKOUT_WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/checkout".into()),
            remote_url: std::env::var("REMOTE_STORE_URL")
                .unwrap_or_else(|_| "http://localhost:54321".into()),
            remote_api_key: std::env::var("REMOTE_STORE_API_KEY").unwrap_or_default(),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Path of the offline store database file
    pub fn offline_db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("offline.redb")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
