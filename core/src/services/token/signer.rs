//! Signing collaborator: turns parameters into signed tokens and back into payloads

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Header, Validation};

use crate::domain::entities::token::{TokenParameters, TokenPayload, EXPIRES_AT_KEY, SUBJECT_KEY};
use crate::errors::{DomainError, DomainResult, TokenError};

use super::config::TokenServiceConfig;
use super::key_manager::SigningKey;

/// Signs and verifies tokens
///
/// Verification reports expiry (`TokenExpired`) separately from the invalid
/// outcomes, and never reports a token that fails its signature check as expired.
pub trait TokenSigner: Send + Sync {
    /// Signs a token for the given parameters
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The compact signed token
    /// * `Err(DomainError::Token(TokenGenerationFailed))` - Signing failed
    fn sign(&self, params: &TokenParameters) -> DomainResult<String>;

    /// Verifies a token and decodes its payload
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPayload)` - Signature valid and token not expired
    /// * `Err(TokenError::TokenExpired)` - Signature valid but past expiry
    /// * `Err(TokenError::InvalidSignature)` - Signature does not match
    /// * `Err(TokenError::InvalidTokenFormat)` - Not a decodable token
    /// * `Err(TokenError::InvalidClaims)` - Required claims missing or malformed
    fn verify(&self, token: &str) -> Result<TokenPayload, TokenError>;
}

/// HMAC-SHA JWT signer
#[derive(Debug, Clone)]
pub struct JwtSigner {
    key: SigningKey,
    validation: Validation,
}

impl JwtSigner {
    /// Creates a signer for `key`, tolerating `leeway_seconds` of clock skew on expiry
    pub fn new(key: SigningKey, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(key.algorithm());
        validation.leeway = leeway_seconds;
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&[EXPIRES_AT_KEY, SUBJECT_KEY]);

        Self { key, validation }
    }

    /// Creates a signer from the service configuration
    ///
    /// # Returns
    ///
    /// * `Ok(JwtSigner)` - Signer ready
    /// * `Err(DomainError::Validation)` - Secret shorter than 32 bytes
    pub fn from_config(config: &TokenServiceConfig) -> DomainResult<Self> {
        let key = SigningKey::from_secret(&config.secret)?;
        Ok(Self::new(key, config.leeway_seconds))
    }

    pub fn key(&self) -> &SigningKey {
        &self.key
    }
}

impl TokenSigner for JwtSigner {
    fn sign(&self, params: &TokenParameters) -> DomainResult<String> {
        let payload = TokenPayload::from_parameters(params);
        let header = Header::new(self.key.algorithm());

        encode(&header, &payload, self.key.encoding_key()).map_err(|e| {
            tracing::error!(error = %e, subject = %params.subject(), "Failed to sign token");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        decode::<TokenPayload>(token, self.key.decoding_key(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let error = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                        TokenError::InvalidClaims
                    }
                    _ => TokenError::InvalidTokenFormat,
                };
                tracing::debug!(error = %e, "Token verification failed");
                error
            })
    }
}
