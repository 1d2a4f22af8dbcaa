//! Client configuration.
//!
//! Settings come from the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `GSCTL_BASE_URL` | `http://localhost:8080` | Panel API base URL |
//! | `GSCTL_TOKEN` | unset | Bearer token |
//! | `GSCTL_CONNECT_TIMEOUT_SECS` | unset | TCP connect timeout |
//! | `GSCTL_LOG_CAPACITY` | `1000` | Log lines kept per server |
//!
//! No read timeout is applied. A start stream may sit on heartbeats for as
//! long as an image pull takes.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Configuration for the panel client.
///
/// # Example
///
/// ```
/// use gsctl::config::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_base_url("http://panel.local:8080")
///     .with_connect_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url, "http://panel.local:8080");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Panel API base URL, without trailing slash
    pub base_url: String,
    /// Bearer token, if configured
    pub token: Option<String>,
    /// Connect timeout for HTTP requests
    pub connect_timeout: Option<Duration>,
    /// Log lines kept per server in dashboard state
    pub log_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            connect_timeout: None,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL (a trailing slash is removed).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    /// Read configuration from `GSCTL_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unparseable numbers are logged and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("GSCTL_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }

        if let Some(token) = lookup("GSCTL_TOKEN").filter(|v| !v.trim().is_empty()) {
            config = config.with_token(token.trim());
        }

        if let Some(raw) = lookup("GSCTL_CONNECT_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config = config.with_connect_timeout(Duration::from_secs(secs)),
                Err(_) => warn!(value = %raw, "Ignoring invalid GSCTL_CONNECT_TIMEOUT_SECS"),
            }
        }

        if let Some(raw) = lookup("GSCTL_LOG_CAPACITY") {
            match raw.trim().parse::<usize>() {
                Ok(capacity) => config = config.with_log_capacity(capacity),
                Err(_) => warn!(value = %raw, "Ignoring invalid GSCTL_LOG_CAPACITY"),
            }
        }

        config
    }
}
