//! Token signing and lifetime configuration

use serde::{Deserialize, Serialize};

/// Secret used when nothing else is configured
pub const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// Token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// HMAC secret used to sign tokens (at least 32 bytes)
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: u64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: u64,

    /// Clock skew tolerated when checking expiry, in seconds
    pub leeway: u64,

    /// Optional namespace prepended to storage keys
    pub key_namespace: Option<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            leeway: 0,
            key_namespace: None,
        }
    }
}

impl TokenConfig {
    /// Create a new token configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: u64) -> Self {
        self.access_token_expiry = minutes.saturating_mul(60);
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: u64) -> Self {
        self.refresh_token_expiry = days.saturating_mul(86400);
        self
    }

    /// Set the storage key namespace
    pub fn with_key_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.key_namespace = Some(namespace.into());
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_config_default() {
        let config = TokenConfig::default();
        assert!(config.is_using_default_secret());
        assert_eq!(config.access_token_expiry, 15 * 60);
        assert_eq!(config.refresh_token_expiry, 7 * 24 * 3600);
        assert_eq!(config.leeway, 0);
        assert!(config.key_namespace.is_none());
    }

    #[test]
    fn test_token_config_builders() {
        let config = TokenConfig::new("another-secret-that-is-long-enough-to-sign")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(1)
            .with_key_namespace("billing");

        assert!(!config.is_using_default_secret());
        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 86400);
        assert_eq!(config.key_namespace.as_deref(), Some("billing"));
    }

    #[test]
    fn test_expiry_builders_saturate_on_overflow() {
        let config = TokenConfig::default()
            .with_access_expiry_minutes(u64::MAX)
            .with_refresh_expiry_days(u64::MAX / 1000);

        assert_eq!(config.access_token_expiry, u64::MAX);
        assert_eq!(config.refresh_token_expiry, u64::MAX);
    }
}
