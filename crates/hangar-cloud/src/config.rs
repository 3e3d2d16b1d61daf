//! Cloud API configuration loaded from environment variables.
//!
//! All settings have sensible defaults so callers can talk to the public
//! service with zero configuration.

use std::time::Duration;

/// Base URL of the public build service.
pub const DEFAULT_BASE_URL: &str = "https://build-api.cloud.unity3d.com";

/// Cloud API configuration.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Base URL of the build service, without a trailing slash.
    /// Env: `HANGAR_API_URL`
    /// Default: [`DEFAULT_BASE_URL`]
    pub base_url: String,

    /// Per-request timeout.
    /// Env: `HANGAR_API_TIMEOUT_SECS`
    /// Default: 30 seconds.
    pub request_timeout: Duration,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl CloudConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("HANGAR_API_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(val) = std::env::var("HANGAR_API_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse::<u64>() {
                config.request_timeout = Duration::from_secs(secs);
            } else {
                tracing::warn!(
                    value = %val,
                    "Invalid HANGAR_API_TIMEOUT_SECS, using default"
                );
            }
        }

        config
    }
}
