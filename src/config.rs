//! Client configuration.

use crate::errors::{MaibError, Result};
use crate::utils::parse_base_url;
use std::time::Duration;
use url::Url;

/// Production base URL of the maib e-commerce API.
pub const DEFAULT_BASE_URL: &str = "https://api.maibmerchants.md/v1/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "MAIB_BASE_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "MAIB_TIMEOUT_SECS";

/// Configuration shared by every request a client sends.
#[derive(Clone, Debug, PartialEq)]
pub struct MaibConfig {
    /// Endpoint prefix, always ending with `/`
    pub base_url: Url,

    /// Per-request timeout
    pub timeout: Duration,
}

impl MaibConfig {
    /// Creates a configuration pointing at the production API.
    ///
    /// # Examples
    ///
    /// ```
    /// use maib_rs::config::MaibConfig;
    /// use std::time::Duration;
    ///
    /// let config = MaibConfig::new()
    ///     .with_base_url("https://sandbox.example.test/v1")
    ///     .unwrap()
    ///     .with_timeout(Duration::from_secs(10));
    ///
    /// assert_eq!(config.base_url.as_str(), "https://sandbox.example.test/v1/");
    /// ```
    pub fn new() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a configuration from `MAIB_BASE_URL` and `MAIB_TIMEOUT_SECS`,
    /// falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::new();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&base_url)?;
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                MaibError::ConfigError(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

impl Default for MaibConfig {
    fn default() -> Self {
        Self::new()
    }
}
