//! Client configuration.

use std::{path::PathBuf, time::Duration};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Registry server base URL.
    pub base_url: String,
    /// Interval between timer-driven refreshes.
    pub poll_interval: Duration,
    /// Upper bound on each remote call.
    pub request_timeout: Duration,
    /// Preferences file. `None` uses the platform config directory.
    pub prefs_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(5),
            prefs_path: None,
        }
    }
}
