//! HMAC key management for JWT signing and verification

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::errors::{DomainResult, ValidationError};

/// Minimum secret length in bytes (256 bits)
pub const MIN_SECRET_LENGTH: usize = 32;

/// HMAC key pair derived from a shared secret
///
/// The algorithm follows the secret length: 64 bytes or more selects HS512,
/// 48 or more HS384, anything else HS256.
#[derive(Clone)]
pub struct SigningKey {
    /// Key for signing JWTs
    encoding_key: EncodingKey,
    /// Key for verifying JWTs
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Derives the key pair from a shared secret
    ///
    /// # Arguments
    ///
    /// * `secret` - The HMAC secret, at least [`MIN_SECRET_LENGTH`] bytes
    ///
    /// # Returns
    ///
    /// * `Ok(SigningKey)` - Key derived successfully
    /// * `Err(DomainError::Validation)` - Secret too short
    ///
    /// # Example
    ///
    /// ```
    /// use jsonwebtoken::Algorithm;
    /// use tk_core::services::token::SigningKey;
    ///
    /// let key = SigningKey::from_secret("0123456789abcdef0123456789abcdef").unwrap();
    /// assert_eq!(key.algorithm(), Algorithm::HS256);
    /// ```
    pub fn from_secret(secret: &str) -> DomainResult<Self> {
        let bytes = secret.as_bytes();
        if bytes.len() < MIN_SECRET_LENGTH {
            return Err(ValidationError::InvalidLength {
                field: "secret".to_string(),
                expected: MIN_SECRET_LENGTH,
                actual: bytes.len(),
            }
            .into());
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            algorithm: Self::algorithm_for_length(bytes.len()),
        })
    }

    fn algorithm_for_length(len: usize) -> Algorithm {
        match len {
            64.. => Algorithm::HS512,
            48.. => Algorithm::HS384,
            _ => Algorithm::HS256,
        }
    }

    /// Returns the encoding key for signing JWTs
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Returns the decoding key for verifying JWTs
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}
