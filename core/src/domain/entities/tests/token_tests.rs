//! Unit tests for token entities

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use std::collections::HashMap;

use crate::domain::entities::token::{TokenParameters, TokenPayload, TOKEN_TYPE_KEY};
use crate::errors::{DomainError, ValidationError};

#[test]
fn test_builder_derives_validity_window() {
    let before = Utc::now();
    let params = TokenParameters::builder("user-1", "access", Duration::minutes(30))
        .build()
        .unwrap();
    let after = Utc::now();

    assert_eq!(params.subject(), "user-1");
    assert_eq!(params.token_type(), "access");
    assert!(params.claims().is_empty());
    assert!(params.issued_at() >= before && params.issued_at() <= after);
    assert_eq!(params.expires_at(), params.issued_at() + Duration::minutes(30));
    assert_eq!(params.duration(), Duration::minutes(30));
    assert!(params.expires_at() > params.issued_at());
}

#[test]
fn test_with_claim_upserts() {
    let params = TokenParameters::builder("user-1", "access", Duration::minutes(5))
        .with_claim("role", "user")
        .with_claim("role", "admin")
        .with_claim("level", 3)
        .build()
        .unwrap();

    assert_eq!(params.claims().len(), 2);
    assert_eq!(params.claim("role"), Some(&json!("admin")));
    assert_eq!(params.claim("level"), Some(&json!(3)));
}

#[test]
fn test_with_claims_merges_instead_of_replacing() {
    let mut bulk = HashMap::new();
    bulk.insert("tenant", json!("acme"));
    bulk.insert("role", json!("admin"));

    let params = TokenParameters::builder("user-1", "access", Duration::minutes(5))
        .with_claim("role", "user")
        .with_claim("scope", "read")
        .with_claims(bulk)
        .build()
        .unwrap();

    assert_eq!(params.claims().len(), 3);
    assert_eq!(params.claim("scope"), Some(&json!("read")));
    assert_eq!(params.claim("tenant"), Some(&json!("acme")));
    assert_eq!(params.claim("role"), Some(&json!("admin")));
}

#[test]
fn test_issued_at_keeps_duration() {
    let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let params = TokenParameters::builder("user-1", "refresh", Duration::days(7))
        .issued_at(anchor)
        .build()
        .unwrap();

    assert_eq!(params.issued_at(), anchor);
    assert_eq!(params.expires_at(), anchor + Duration::days(7));
    assert!(params.is_expired_at(anchor + Duration::days(7)));
    assert!(!params.is_expired_at(anchor + Duration::days(6)));
}

#[test]
fn test_empty_subject_is_rejected() {
    let result = TokenParameters::builder("  ", "access", Duration::minutes(5)).build();

    assert!(matches!(
        result,
        Err(DomainError::Validation(ValidationError::RequiredField { ref field })) if field == "subject"
    ));
}

#[test]
fn test_empty_type_is_rejected() {
    let result = TokenParameters::builder("user-1", "", Duration::minutes(5)).build();

    assert!(matches!(
        result,
        Err(DomainError::Validation(ValidationError::RequiredField { ref field })) if field == "token_type"
    ));
}

#[test]
fn test_non_positive_duration_is_rejected() {
    let zero = TokenParameters::builder("user-1", "access", Duration::zero()).build();
    let negative = TokenParameters::builder("user-1", "access", Duration::seconds(-10)).build();

    assert!(matches!(
        zero,
        Err(DomainError::Validation(ValidationError::OutOfRange { .. }))
    ));
    assert!(matches!(
        negative,
        Err(DomainError::Validation(ValidationError::OutOfRange { .. }))
    ));
}

#[test]
fn test_payload_from_parameters() {
    let params = TokenParameters::builder("user-1", "access", Duration::minutes(30))
        .with_claim("role", "admin")
        .build()
        .unwrap();

    let payload = TokenPayload::from_parameters(&params);

    assert_eq!(payload.sub, "user-1");
    assert_eq!(payload.token_type, "access");
    assert_eq!(payload.iat, params.issued_at().timestamp());
    assert_eq!(payload.exp, params.expires_at().timestamp());
    assert!(!payload.jti.is_empty());
    assert_eq!(payload.claims.get("role"), Some(&json!("admin")));
}

#[test]
fn test_payload_reserved_claims_win() {
    let params = TokenParameters::builder("user-1", "access", Duration::minutes(30))
        .with_claim(TOKEN_TYPE_KEY, "refresh")
        .with_claim("sub", "someone-else")
        .build()
        .unwrap();

    let payload = TokenPayload::from_parameters(&params);

    assert_eq!(payload.token_type, "access");
    assert_eq!(payload.sub, "user-1");
    assert!(payload.claims.is_empty());
}

#[test]
fn test_payload_serializes_type_under_reserved_name() {
    let params = TokenParameters::builder("user-1", "access", Duration::minutes(30))
        .with_claim("role", "admin")
        .build()
        .unwrap();
    let payload = TokenPayload::from_parameters(&params);

    let value = serde_json::to_value(&payload).unwrap();

    assert_eq!(value["tokenType"], json!("access"));
    assert_eq!(value["sub"], json!("user-1"));
    assert_eq!(value["role"], json!("admin"));
    assert!(value.get("token_type").is_none());
    assert!(value.get("claims").is_none());
}

#[test]
fn test_payload_jti_is_unique_per_mint() {
    let params = TokenParameters::builder("user-1", "access", Duration::minutes(30))
        .build()
        .unwrap();

    let first = TokenPayload::from_parameters(&params);
    let second = TokenPayload::from_parameters(&params);

    assert_ne!(first.jti, second.jti);
}

#[test]
fn test_payload_map_and_lookup() {
    let params = TokenParameters::builder("user-1", "access", Duration::minutes(30))
        .with_claim("role", "admin")
        .build()
        .unwrap();
    let payload = TokenPayload::from_parameters(&params);

    let map = payload.to_map();
    assert_eq!(map.get("sub"), Some(&json!("user-1")));
    assert_eq!(map.get("tokenType"), Some(&json!("access")));
    assert_eq!(map.get("role"), Some(&json!("admin")));
    assert_eq!(map.len(), 6);

    assert_eq!(payload.get("exp"), Some(json!(payload.exp)));
    assert_eq!(payload.get("role"), Some(json!("admin")));
    assert_eq!(payload.get("missing"), None);
}

#[test]
fn test_payload_expiry_boundary() {
    let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let params = TokenParameters::builder("user-1", "access", Duration::minutes(10))
        .issued_at(anchor)
        .build()
        .unwrap();
    let payload = TokenPayload::from_parameters(&params);

    assert_eq!(payload.expires_at(), Some(anchor + Duration::minutes(10)));
    assert!(!payload.is_expired_at(anchor + Duration::minutes(9)));
    assert!(payload.is_expired_at(anchor + Duration::minutes(10)));
    assert!(payload.is_expired_at(anchor + Duration::hours(1)));
}
