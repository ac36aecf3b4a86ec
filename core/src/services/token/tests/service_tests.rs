//! Unit tests for the stateless token service and the provided inspection methods

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use super::{access_params, expired_params, tamper_signature, test_config};
use crate::domain::entities::token::TokenParameters;
use crate::errors::{DomainError, TokenError};
use crate::services::token::{StatelessTokenService, TokenService};

fn service() -> StatelessTokenService {
    StatelessTokenService::new(&test_config()).unwrap()
}

#[tokio::test]
async fn test_create_then_verify_recovers_parameters() {
    let service = service();
    let params = TokenParameters::builder("user-1", "access", Duration::minutes(30))
        .with_claim("role", "admin")
        .with_claim("level", 3)
        .with_claim("scopes", json!(["read", "write"]))
        .build()
        .unwrap();

    let token = service.create(&params).await.unwrap();

    assert_eq!(service.subject(&token).unwrap(), "user-1");
    assert_eq!(service.token_type(&token).unwrap(), "access");
    let claims = service.claims(&token).unwrap();
    for (key, value) in params.claims() {
        assert_eq!(claims.get(key), Some(value), "claim {}", key);
    }
    assert_eq!(claims.get("sub"), Some(&json!("user-1")));
    assert_eq!(claims.get("tokenType"), Some(&json!("access")));
    assert_eq!(claims.get("exp"), Some(&json!(params.expires_at().timestamp())));
}

#[tokio::test]
async fn test_stateless_create_always_mints() {
    let service = service();
    let params = access_params("user-1");

    let first = service.create(&params).await.unwrap();
    let second = service.create(&params).await.unwrap();

    assert_ne!(first, second);
    assert!(service.verify(&first).is_ok());
    assert!(service.verify(&second).is_ok());
}

#[tokio::test]
async fn test_has_claim() {
    let service = service();
    let token = service.create(&access_params("user-1")).await.unwrap();

    assert!(service.has(&token, "role", &json!("admin")).unwrap());
    assert!(!service.has(&token, "role", &json!("user")).unwrap());
    assert!(!service.has(&token, "missing", &json!("admin")).unwrap());
    assert!(service.has(&token, "sub", &json!("user-1")).unwrap());
    assert!(service.has(&token, "tokenType", &json!("access")).unwrap());
}

#[tokio::test]
async fn test_has_compares_exact_values() {
    let service = service();
    let params = TokenParameters::builder("user-1", "access", Duration::minutes(5))
        .with_claim("level", 3)
        .build()
        .unwrap();
    let token = service.create(&params).await.unwrap();

    assert!(service.has(&token, "level", &json!(3)).unwrap());
    assert!(!service.has(&token, "level", &json!("3")).unwrap());
}

#[tokio::test]
async fn test_has_on_tampered_token_fails() {
    let service = service();
    let token = service.create(&access_params("user-1")).await.unwrap();

    let result = service.has(&tamper_signature(&token), "role", &json!("admin"));

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
}

#[tokio::test]
async fn test_projections_fail_like_verify() {
    let service = service();
    let expired = service.create(&expired_params("user-1")).await.unwrap();

    assert!(service.verify(&expired).unwrap_err().is_token_expired());
    assert!(service.subject(&expired).unwrap_err().is_token_expired());
    assert!(service.token_type(&expired).unwrap_err().is_token_expired());
    assert!(service.claims(&expired).unwrap_err().is_token_expired());
    assert!(service.subject("garbage").unwrap_err().is_invalid_token());
}

#[tokio::test]
async fn test_is_expired() {
    let service = service();
    let live = service.create(&access_params("user-1")).await.unwrap();
    let expired = service.create(&expired_params("user-1")).await.unwrap();

    assert!(!service.is_expired(&live).unwrap());
    assert!(service.is_expired(&expired).unwrap());
}

#[tokio::test]
async fn test_is_expired_on_invalid_token_is_an_error() {
    let service = service();
    let expired = service.create(&expired_params("user-1")).await.unwrap();

    let result = service.is_expired(&tamper_signature(&expired));

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidSignature))
    ));
    assert!(service.is_expired("not-a-token").unwrap_err().is_invalid_token());
}

#[tokio::test]
async fn test_is_expired_at_is_monotonic() {
    let service = service();
    let params = access_params("user-1");
    let token = service.create(&params).await.unwrap();
    let exp = Utc.timestamp_opt(params.expires_at().timestamp(), 0).unwrap();

    let instants = [
        params.issued_at(),
        exp - Duration::seconds(1),
        exp,
        exp + Duration::seconds(1),
        exp + Duration::days(365),
    ];
    let results: Vec<bool> = instants
        .iter()
        .map(|at| service.is_expired_at(&token, *at).unwrap())
        .collect();

    assert_eq!(results, vec![false, false, true, true, true]);
}

#[tokio::test]
async fn test_signer_is_exposed() {
    let service = service();
    let token = service.signer().sign(&access_params("user-1")).unwrap();

    assert_eq!(service.subject(&token).unwrap(), "user-1");
}
