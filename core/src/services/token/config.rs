//! Configuration for the token service

use chrono::Duration;
use tk_shared::config::token::{TokenConfig, DEFAULT_SECRET};

use crate::domain::entities::token::{TokenParameters, TokenParametersBuilder};
use crate::domain::entities::{ACCESS_TOKEN_TYPE, REFRESH_TOKEN_TYPE};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Clock skew tolerated when checking expiry, in seconds
    pub leeway_seconds: u64,
    /// Lifetime of access tokens
    pub access_token_expiry: Duration,
    /// Lifetime of refresh tokens
    pub refresh_token_expiry: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            leeway_seconds: 0,
            access_token_expiry: Duration::minutes(15),
            refresh_token_expiry: Duration::days(7),
        }
    }
}

impl TokenServiceConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Builder for an access token of `subject`, valid for the configured access lifetime
    pub fn access_parameters(&self, subject: impl Into<String>) -> TokenParametersBuilder {
        TokenParameters::builder(subject, ACCESS_TOKEN_TYPE, self.access_token_expiry)
    }

    /// Builder for a refresh token of `subject`, valid for the configured refresh lifetime
    pub fn refresh_parameters(&self, subject: impl Into<String>) -> TokenParametersBuilder {
        TokenParameters::builder(subject, REFRESH_TOKEN_TYPE, self.refresh_token_expiry)
    }
}

impl From<&TokenConfig> for TokenServiceConfig {
    fn from(config: &TokenConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            leeway_seconds: config.leeway,
            access_token_expiry: seconds(config.access_token_expiry),
            refresh_token_expiry: seconds(config.refresh_token_expiry),
        }
    }
}

// Saturates at the largest representable duration
fn seconds(value: u64) -> Duration {
    let max = i64::MAX / 1_000;
    Duration::seconds(i64::try_from(value).unwrap_or(max).min(max))
}
