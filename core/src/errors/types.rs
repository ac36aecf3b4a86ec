//! Error type definitions for token parameters, token verification and storage

use thiserror::Error;

/// Validation errors
///
/// Raised for bad builder or configuration input. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Out of range: {field} (min: {min}, max: {max})")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    #[error("Invalid length: {field} (expected: {expected}, actual: {actual})")]
    InvalidLength {
        field: String,
        expected: usize,
        actual: usize,
    },
}

/// Token-related errors
///
/// `TokenExpired` is kept apart from the invalid outcomes: a tampered
/// token must never be reported as merely expired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    /// Whether the token is unverifiable (as opposed to expired or a signing failure)
    pub fn is_invalid(&self) -> bool {
        matches!(
            self,
            TokenError::InvalidTokenFormat | TokenError::InvalidSignature | TokenError::InvalidClaims
        )
    }
}

/// Token storage errors
///
/// Only durable backends produce these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Token storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("Token storage error: {message}")]
    Backend { message: String },
}
