//! Cache configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Connection attempts before giving up
    pub max_connect_retries: u32,

    /// Base delay between connection attempts in milliseconds (doubles per attempt)
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            max_connect_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the connection timeout in seconds
    pub fn with_connection_timeout(mut self, seconds: u64) -> Self {
        self.connection_timeout = seconds;
        self
    }

    /// Set the number of connection attempts (at least one)
    pub fn with_max_connect_retries(mut self, retries: u32) -> Self {
        self.max_connect_retries = retries.max(1);
        self
    }

    /// Connection timeout as a duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.connection_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_connect_retries, 3);
    }

    #[test]
    fn test_cache_config_builders() {
        let config = CacheConfig::new("redis://cache:6379")
            .with_connection_timeout(2)
            .with_max_connect_retries(0);

        assert_eq!(config.url, "redis://cache:6379");
        assert_eq!(config.connection_timeout, 2);
        assert_eq!(config.max_connect_retries, 1);
    }
}
