//! Client configuration.
//!
//! Resolved once at construction and passed into the gateway. Nothing here
//! reads environment variables during request handling.

use crate::{ApiError, ApiResult};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote API configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given base URL, e.g.
    /// `https://records.example.org`. A trailing slash is stripped; the
    /// `/api` prefix is added per request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] for an empty or non-HTTP URL.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidConfig("base URL cannot be empty".into()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{base_url}'"
            )));
        }

        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for a path under the `/api` surface. `path` must start
    /// with `/`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}
