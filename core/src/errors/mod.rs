//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{StorageError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors
///
/// Bridges the three failure families of the token lifecycle:
/// invalid parameters, unverifiable tokens and unavailable storage.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// The token error carried by this error, if any
    pub fn as_token_error(&self) -> Option<&TokenError> {
        match self {
            DomainError::Token(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the token could not be verified (tampered, malformed or bad claims)
    pub fn is_invalid_token(&self) -> bool {
        self.as_token_error().is_some_and(TokenError::is_invalid)
    }

    /// Whether the token verified but is past its expiry
    pub fn is_token_expired(&self) -> bool {
        matches!(self, DomainError::Token(TokenError::TokenExpired))
    }

    /// Whether the storage backend could not be reached
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, DomainError::Storage(StorageError::Unavailable { .. }))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
