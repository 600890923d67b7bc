use std::env;
use std::path::PathBuf;

use tracing::info;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Google Custom Search
    pub google_api_key: String,
    pub google_cse_id: String,

    // Email notification
    pub resend_api_key: String,
    pub notify_from: String,
    pub notify_to: String,

    // Persisted state
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing; a run must
    /// never start half-configured.
    pub fn from_env() -> Self {
        Self {
            google_api_key: required_env("GOOGLE_API_KEY"),
            google_cse_id: required_env("GOOGLE_CSE_ID"),
            resend_api_key: required_env("RESEND_API_KEY"),
            notify_from: required_env("NOTIFY_FROM"),
            notify_to: required_env("NOTIFY_TO"),
            data_dir: PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string())),
        }
    }

    /// Log the configuration without leaking secrets.
    pub fn log_redacted(&self) {
        info!(
            google_api_key_set = !self.google_api_key.is_empty(),
            google_cse_id = %self.google_cse_id,
            resend_api_key_set = !self.resend_api_key.is_empty(),
            notify_to = %self.notify_to,
            data_dir = %self.data_dir.display(),
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
