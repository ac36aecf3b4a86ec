mod service_tests;

use chrono::{Duration, Utc};

use crate::domain::entities::token::TokenParameters;
use crate::services::token::TokenServiceConfig;

pub(super) const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

pub(super) fn test_config() -> TokenServiceConfig {
    TokenServiceConfig::new(TEST_SECRET)
}

pub(super) fn access_params(subject: &str) -> TokenParameters {
    TokenParameters::builder(subject, "access", Duration::minutes(30))
        .with_claim("role", "admin")
        .build()
        .unwrap()
}

/// Parameters whose validity window closed an hour ago
pub(super) fn expired_params(subject: &str) -> TokenParameters {
    TokenParameters::builder(subject, "access", Duration::hours(1))
        .issued_at(Utc::now() - Duration::hours(2))
        .build()
        .unwrap()
}

/// Replaces one character in the middle of the signature segment
pub(super) fn tamper_signature(token: &str) -> String {
    let (head, signature) = token.rsplit_once('.').unwrap();
    let mut chars: Vec<char> = signature.chars().collect();
    let mid = chars.len() / 2;
    chars[mid] = if chars[mid] == 'A' { 'B' } else { 'A' };
    format!("{}.{}", head, chars.into_iter().collect::<String>())
}
