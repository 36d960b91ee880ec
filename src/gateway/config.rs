//! Gateway configuration.
//!
//! This module defines the TOML-deserializable configuration for the HTTP
//! gateway. Token acquisition is out of scope: the API key arrives here as an
//! opaque string and is sent verbatim in the `Authorization` header.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{ApiError, Result};

/// Configuration for [`HttpGateway`](crate::gateway::HttpGateway).
///
/// All duration fields are in seconds; a value of 0 means unbounded.
///
/// # Examples
///
/// ```
/// use sellerlink::gateway::GatewayConfig;
///
/// let config = GatewayConfig::from_toml(r#"
///     base_url = "https://api.example.com/v1"
///     api_key = "key-123"
///     timeout_secs = 30
/// "#)?;
///
/// assert_eq!(config.base_url, "https://api.example.com/v1");
/// # Ok::<(), sellerlink::ApiError>(())
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL all request paths are appended to.
    pub base_url: String,

    /// API key sent as the default `Authorization` header value.
    pub api_key: String,

    /// Total request timeout in seconds. 0 disables the timeout, matching
    /// the remote API's reference clients.
    #[serde(default)]
    pub timeout_secs: u64,

    /// Connection timeout in seconds. 0 disables the timeout.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum idle connections per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Optional `User-Agent` header value.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl GatewayConfig {
    /// Creates a configuration with default limits.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: 0,
            connect_timeout_secs: default_connect_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle(),
            user_agent: None,
        }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the TOML does not parse or fails
    /// validation.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml).map_err(|e| ApiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL does not parse or the
    /// API key is empty.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base_url `{}`: {e}", self.base_url)))?;
        if self.api_key.is_empty() {
            return Err(ApiError::Config("api_key must not be empty".to_owned()));
        }
        Ok(())
    }

    /// Returns the request timeout, `None` when unbounded.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Returns the connection timeout, `None` when unbounded.
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_pool_max_idle() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_defaults() {
        let config = GatewayConfig::new("https://api.example.com", "key-123");
        assert_eq!(config.timeout_secs, 0);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_config_from_toml() {
        let config = GatewayConfig::from_toml(
            r#"
            base_url = "https://api.example.com/v1"
            api_key = "key-123"
            timeout_secs = 45
            connect_timeout_secs = 15
            pool_max_idle_per_host = 20
            user_agent = "sellerlink/0.1"
        "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.api_key, "key-123");
        assert_eq!(config.timeout_secs, 45);
        assert_eq!(config.connect_timeout_secs, 15);
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert_eq!(config.user_agent.as_deref(), Some("sellerlink/0.1"));
    }

    #[test]
    fn test_config_from_toml_applies_defaults() {
        let config = GatewayConfig::from_toml(
            r#"
            base_url = "https://api.example.com"
            api_key = "key-123"
        "#,
        )
        .unwrap();

        assert_eq!(config.timeout_secs, 0);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.pool_max_idle_per_host, 10);
    }

    #[test]
    fn test_config_from_toml_missing_required_field() {
        let result = GatewayConfig::from_toml("api_key = \"key-123\"");
        assert!(matches!(result.unwrap_err(), ApiError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_unparsable_base_url() {
        let config = GatewayConfig::new("not a url", "key-123");
        assert!(matches!(config.validate().unwrap_err(), ApiError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let config = GatewayConfig::new("https://api.example.com", "");
        assert!(matches!(config.validate().unwrap_err(), ApiError::Config(_)));
    }

    #[test]
    fn test_zero_timeout_means_unbounded() {
        let mut config = GatewayConfig::new("https://api.example.com", "key-123");
        assert!(config.timeout().is_none());

        config.timeout_secs = 30;
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));

        config.connect_timeout_secs = 0;
        assert!(config.connect_timeout().is_none());
    }
}
