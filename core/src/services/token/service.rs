//! Token lifecycle coordination: issuing, verifying, inspecting and invalidating tokens

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::entities::token::{TokenParameters, TokenPayload};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::token::{InMemoryTokenStorage, TokenStorage};

use super::config::TokenServiceConfig;
use super::signer::{JwtSigner, TokenSigner};

/// Coordinates token creation with verification and claim inspection
///
/// Only `create` touches storage. Every inspection method verifies the token
/// first and fails exactly like [`TokenService::verify`].
#[async_trait]
pub trait TokenService: Send + Sync {
    /// The collaborator used to sign and verify tokens
    fn signer(&self) -> &dyn TokenSigner;

    /// Issues a token for the given parameters
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The signed token
    /// * `Err(DomainError)` - Signing or storage failed
    async fn create(&self, params: &TokenParameters) -> DomainResult<String>;

    /// Verifies a token and returns its payload
    fn verify(&self, token: &str) -> DomainResult<TokenPayload> {
        self.signer().verify(token).map_err(DomainError::from)
    }

    /// Whether the token has expired now
    fn is_expired(&self, token: &str) -> DomainResult<bool> {
        self.is_expired_at(token, Utc::now())
    }

    /// Whether the token is expired at `at`
    ///
    /// A token the signer already rejects as expired is expired at any instant.
    /// Tokens that fail verification for any other reason are an error.
    fn is_expired_at(&self, token: &str, at: DateTime<Utc>) -> DomainResult<bool> {
        match self.signer().verify(token) {
            Ok(payload) => Ok(payload.is_expired_at(at)),
            Err(TokenError::TokenExpired) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the payload maps `key` to exactly `value`
    ///
    /// Reserved fields (`sub`, `tokenType`, `iat`, `exp`, `jti`) can be matched too.
    fn has(&self, token: &str, key: &str, value: &Value) -> DomainResult<bool> {
        let payload = self.verify(token)?;
        Ok(payload.get(key).as_ref() == Some(value))
    }

    fn subject(&self, token: &str) -> DomainResult<String> {
        Ok(self.verify(token)?.sub)
    }

    fn token_type(&self, token: &str) -> DomainResult<String> {
        Ok(self.verify(token)?.token_type)
    }

    /// The full payload, reserved fields included
    fn claims(&self, token: &str) -> DomainResult<HashMap<String, Value>> {
        Ok(self.verify(token)?.to_map())
    }
}

/// Token service that mints a fresh token on every `create` and keeps nothing
#[derive(Clone)]
pub struct StatelessTokenService {
    signer: Arc<dyn TokenSigner>,
}

impl StatelessTokenService {
    /// Creates a service signing with a JWT signer built from `config`
    ///
    /// # Returns
    ///
    /// * `Ok(StatelessTokenService)` - Service ready
    /// * `Err(DomainError::Validation)` - Secret too short
    pub fn new(config: &TokenServiceConfig) -> DomainResult<Self> {
        Ok(Self::with_signer(JwtSigner::from_config(config)?))
    }

    pub fn with_signer(signer: impl TokenSigner + 'static) -> Self {
        Self {
            signer: Arc::new(signer),
        }
    }
}

#[async_trait]
impl TokenService for StatelessTokenService {
    fn signer(&self) -> &dyn TokenSigner {
        self.signer.as_ref()
    }

    async fn create(&self, params: &TokenParameters) -> DomainResult<String> {
        let token = self.signer.sign(params)?;
        tracing::debug!(
            subject = %params.subject(),
            token_type = %params.token_type(),
            "Minted token"
        );
        Ok(token)
    }
}

/// Token service keeping at most one live token per subject and type
///
/// `create` is idempotent while the stored token lives: a repeated call returns
/// the stored token unchanged, ignoring the claims it was given. Removing a
/// token from storage is how it gets invalidated.
pub struct PersistentTokenService<S: TokenStorage> {
    signer: Arc<dyn TokenSigner>,
    storage: S,
}

impl<S: TokenStorage> PersistentTokenService<S> {
    /// Creates a service over `storage`, signing with a JWT signer built from `config`
    ///
    /// # Arguments
    ///
    /// * `storage` - Storage holding the active tokens
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// * `Ok(PersistentTokenService)` - Service ready
    /// * `Err(DomainError::Validation)` - Secret too short
    pub fn new(storage: S, config: &TokenServiceConfig) -> DomainResult<Self> {
        Ok(Self::with_signer(storage, JwtSigner::from_config(config)?))
    }

    pub fn with_signer(storage: S, signer: impl TokenSigner + 'static) -> Self {
        Self {
            signer: Arc::new(signer),
            storage,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Invalidates a token wherever it is stored
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The token was stored and has been removed
    /// * `Ok(false)` - The token was not stored
    /// * `Err(DomainError)` - Storage failure
    pub async fn invalidate_token(&self, token: &str) -> DomainResult<bool> {
        let removed = self.storage.remove_token(token).await?;
        if removed {
            tracing::info!("Invalidated token");
        }
        Ok(removed)
    }

    /// Invalidates the token stored for the identity of `params`
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A token was stored and has been removed
    /// * `Ok(false)` - Nothing was stored
    /// * `Err(DomainError)` - Storage failure
    pub async fn invalidate(&self, params: &TokenParameters) -> DomainResult<bool> {
        let removed = self.storage.remove(params).await?;
        if removed {
            tracing::info!(
                subject = %params.subject(),
                token_type = %params.token_type(),
                "Invalidated token"
            );
        }
        Ok(removed)
    }

    /// Whether `token` verifies and is still the stored token for the identity of `params`
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Valid, unexpired and not invalidated
    /// * `Ok(false)` - Expired, invalidated or superseded
    /// * `Err(DomainError::Token)` - The token does not verify
    /// * `Err(DomainError::Storage)` - Storage failure
    pub async fn is_active(
        &self,
        token: &str,
        params: &TokenParameters,
    ) -> DomainResult<bool> {
        match self.signer.verify(token) {
            Ok(_) => self.storage.exists(token, params).await,
            Err(TokenError::TokenExpired) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl PersistentTokenService<InMemoryTokenStorage> {
    /// Creates a service over a fresh in-process storage
    pub fn in_memory(config: &TokenServiceConfig) -> DomainResult<Self> {
        Self::new(InMemoryTokenStorage::new(), config)
    }
}

#[async_trait]
impl<S: TokenStorage> TokenService for PersistentTokenService<S> {
    fn signer(&self) -> &dyn TokenSigner {
        self.signer.as_ref()
    }

    async fn create(&self, params: &TokenParameters) -> DomainResult<String> {
        if let Some(existing) = self.storage.get(params).await? {
            tracing::debug!(
                subject = %params.subject(),
                token_type = %params.token_type(),
                "Reusing stored token"
            );
            return Ok(existing);
        }

        let token = self.signer.sign(params)?;
        self.storage.save(&token, params).await?;

        tracing::info!(
            subject = %params.subject(),
            token_type = %params.token_type(),
            expires_at = %params.expires_at(),
            "Issued token"
        );
        Ok(token)
    }
}
