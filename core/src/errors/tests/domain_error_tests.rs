//! Unit tests for domain error types

use crate::errors::{DomainError, DomainResult, StorageError, TokenError, ValidationError};

#[test]
fn test_validation_error_messages() {
    let error = ValidationError::RequiredField {
        field: "subject".to_string(),
    };
    assert_eq!(error.to_string(), "Required field: subject");

    let error = ValidationError::InvalidLength {
        field: "secret".to_string(),
        expected: 32,
        actual: 8,
    };
    let message = error.to_string();
    assert!(message.contains("secret"));
    assert!(message.contains("32"));
    assert!(message.contains("8"));
}

#[test]
fn test_domain_error_is_transparent() {
    let error: DomainError = TokenError::InvalidSignature.into();
    assert_eq!(error.to_string(), "Invalid signature");

    let error: DomainError = StorageError::Unavailable {
        message: "connection refused".to_string(),
    }
    .into();
    assert_eq!(error.to_string(), "Token storage unavailable: connection refused");
}

#[test]
fn test_invalid_token_classification() {
    assert!(TokenError::InvalidSignature.is_invalid());
    assert!(TokenError::InvalidTokenFormat.is_invalid());
    assert!(TokenError::InvalidClaims.is_invalid());
    assert!(!TokenError::TokenExpired.is_invalid());
    assert!(!TokenError::TokenGenerationFailed.is_invalid());
}

#[test]
fn test_expired_is_not_invalid() {
    let expired: DomainError = TokenError::TokenExpired.into();
    assert!(expired.is_token_expired());
    assert!(!expired.is_invalid_token());

    let tampered: DomainError = TokenError::InvalidSignature.into();
    assert!(tampered.is_invalid_token());
    assert!(!tampered.is_token_expired());
}

#[test]
fn test_storage_classification() {
    let unavailable: DomainError = StorageError::Unavailable {
        message: "timeout".to_string(),
    }
    .into();
    assert!(unavailable.is_storage_unavailable());
    assert!(unavailable.as_token_error().is_none());

    let backend: DomainError = StorageError::Backend {
        message: "WRONGTYPE".to_string(),
    }
    .into();
    assert!(!backend.is_storage_unavailable());
}

fn check_signature(valid: bool) -> Result<(), TokenError> {
    if valid {
        Ok(())
    } else {
        Err(TokenError::InvalidSignature)
    }
}

fn verify_signature(valid: bool) -> DomainResult<&'static str> {
    check_signature(valid)?;
    Ok("verified")
}

#[test]
fn test_domain_result_propagates_family_errors() {
    assert_eq!(verify_signature(true).unwrap(), "verified");
    assert!(matches!(
        verify_signature(false),
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}
