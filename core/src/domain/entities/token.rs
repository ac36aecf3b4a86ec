//! Token entities: the parameters of a token to be issued and the payload of a verified token.

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{DomainResult, ValidationError};

/// Payload field carrying the token type discriminator
pub const TOKEN_TYPE_KEY: &str = "tokenType";

/// Payload field carrying the subject
pub const SUBJECT_KEY: &str = "sub";

/// Payload field carrying the issue time (seconds since epoch)
pub const ISSUED_AT_KEY: &str = "iat";

/// Payload field carrying the expiry time (seconds since epoch)
pub const EXPIRES_AT_KEY: &str = "exp";

/// Payload field carrying the unique token id
pub const TOKEN_ID_KEY: &str = "jti";

/// Claim names written by the signer itself
///
/// A custom claim using one of these names is overridden by the reserved value.
pub const RESERVED_CLAIMS: [&str; 5] = [
    SUBJECT_KEY,
    TOKEN_TYPE_KEY,
    ISSUED_AT_KEY,
    EXPIRES_AT_KEY,
    TOKEN_ID_KEY,
];

/// Conventional type of short-lived access tokens
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// Conventional type of long-lived refresh tokens
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Immutable description of a token to be issued
///
/// Built through [`TokenParameters::builder`]. The validity window is always
/// `issued_at + duration`, so `expires_at > issued_at` holds for every value.
/// `(subject, token_type)` is the storage identity of the token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenParameters {
    claims: HashMap<String, Value>,
    subject: String,
    token_type: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TokenParameters {
    /// Creates a builder for a token issued now and valid for `duration`
    ///
    /// # Arguments
    ///
    /// * `subject` - The principal the token is issued to
    /// * `token_type` - The token purpose, e.g. "access" or "refresh"
    /// * `duration` - Time between issuance and expiry, must be positive
    ///
    /// # Returns
    ///
    /// A `TokenParametersBuilder` with an empty claim map
    pub fn builder(
        subject: impl Into<String>,
        token_type: impl Into<String>,
        duration: Duration,
    ) -> TokenParametersBuilder {
        TokenParametersBuilder {
            claims: HashMap::new(),
            subject: subject.into(),
            token_type: token_type.into(),
            issued_at: Utc::now(),
            duration,
        }
    }

    pub fn claims(&self) -> &HashMap<String, Value> {
        &self.claims
    }

    pub fn claim(&self, key: &str) -> Option<&Value> {
        self.claims.get(key)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Length of the validity window
    pub fn duration(&self) -> Duration {
        self.expires_at - self.issued_at
    }

    /// Whether the validity window has closed at `at`
    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        self.expires_at <= at
    }
}

/// Fluent assembler for [`TokenParameters`]
///
/// Every step consumes and returns the builder; the claim map exists from
/// the start and is only ever merged into.
#[derive(Debug, Clone)]
pub struct TokenParametersBuilder {
    claims: HashMap<String, Value>,
    subject: String,
    token_type: String,
    issued_at: DateTime<Utc>,
    duration: Duration,
}

impl TokenParametersBuilder {
    /// Adds or replaces a single claim
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(key.into(), value.into());
        self
    }

    /// Merges claims into the existing ones, replacing values under equal keys
    pub fn with_claims<I, K, V>(mut self, claims: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.claims
            .extend(claims.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Re-anchors the validity window at `issued_at`, keeping the requested duration
    pub fn issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = issued_at;
        self
    }

    /// Validates the input and produces the immutable parameters
    ///
    /// # Returns
    ///
    /// * `Ok(TokenParameters)` - The validated parameters
    /// * `Err(DomainError::Validation)` - Empty subject or type, or a non-positive duration
    pub fn build(self) -> DomainResult<TokenParameters> {
        if self.subject.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "subject".to_string(),
            }
            .into());
        }

        if self.token_type.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "token_type".to_string(),
            }
            .into());
        }

        if self.duration <= Duration::zero() {
            return Err(ValidationError::OutOfRange {
                field: "duration".to_string(),
                min: "0 (exclusive)".to_string(),
                max: "unbounded".to_string(),
            }
            .into());
        }

        let expires_at = self
            .issued_at
            .checked_add_signed(self.duration)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "duration".to_string(),
                min: "0 (exclusive)".to_string(),
                max: DateTime::<Utc>::MAX_UTC.to_rfc3339(),
            })?;

        Ok(TokenParameters {
            claims: self.claims,
            subject: self.subject,
            token_type: self.token_type,
            issued_at: self.issued_at,
            expires_at,
        })
    }
}

/// Payload of a signed token
///
/// Reserved fields are typed; every other claim lands in `claims`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Subject
    pub sub: String,

    /// Token type discriminator
    #[serde(rename = "tokenType")]
    pub token_type: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID (unique per signing, so two mints never produce the same string)
    pub jti: String,

    /// Custom claims
    #[serde(flatten)]
    pub claims: HashMap<String, Value>,
}

impl TokenPayload {
    /// Builds the payload to sign for the given parameters
    ///
    /// Custom claims named like a reserved field are dropped in favour of the reserved value.
    pub fn from_parameters(params: &TokenParameters) -> Self {
        let claims = params
            .claims()
            .iter()
            .filter(|(key, _)| !RESERVED_CLAIMS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            sub: params.subject().to_string(),
            token_type: params.token_type().to_string(),
            iat: params.issued_at().timestamp(),
            exp: params.expires_at().timestamp(),
            jti: Uuid::new_v4().to_string(),
            claims,
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Whether the token's expiry is at or before `at`
    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        self.exp <= at.timestamp()
    }

    /// Looks up any payload field, reserved or custom
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            SUBJECT_KEY => Some(Value::from(self.sub.clone())),
            TOKEN_TYPE_KEY => Some(Value::from(self.token_type.clone())),
            ISSUED_AT_KEY => Some(Value::from(self.iat)),
            EXPIRES_AT_KEY => Some(Value::from(self.exp)),
            TOKEN_ID_KEY => Some(Value::from(self.jti.clone())),
            _ => self.claims.get(key).cloned(),
        }
    }

    /// The complete payload as a map, reserved fields included
    pub fn to_map(&self) -> HashMap<String, Value> {
        let mut map = self.claims.clone();
        map.insert(SUBJECT_KEY.to_string(), Value::from(self.sub.clone()));
        map.insert(TOKEN_TYPE_KEY.to_string(), Value::from(self.token_type.clone()));
        map.insert(ISSUED_AT_KEY.to_string(), Value::from(self.iat));
        map.insert(EXPIRES_AT_KEY.to_string(), Value::from(self.exp));
        map.insert(TOKEN_ID_KEY.to_string(), Value::from(self.jti.clone()));
        map
    }
}
