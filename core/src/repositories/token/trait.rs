//! Token storage trait defining the single-active-token persistence contract.

use async_trait::async_trait;

use crate::domain::entities::token::TokenParameters;
use crate::errors::DomainResult;

/// Storage trait for issued tokens
///
/// Holds at most one token per `(subject, token_type)` identity. This is what
/// lets a signed, self-contained token be invalidated server side: a token that
/// is no longer stored is no longer honoured by callers that check storage.
///
/// # Failure semantics
/// - Durable implementations report connectivity problems as
///   `DomainError::Storage(StorageError::Unavailable)`
/// - Implementations never retry; retry policy belongs to the caller
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Store a token under the identity of `params`, replacing any previous one
    ///
    /// # Arguments
    /// * `token` - The signed token string
    /// * `params` - The parameters the token was minted from
    ///
    /// # Returns
    /// * `Ok(())` - Token stored; it expires at `params.expires_at()`
    /// * `Err(DomainError)` - Backend failure
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::Duration;
    /// # use tk_core::repositories::TokenStorage;
    /// # use tk_core::domain::TokenParameters;
    /// # async fn example(storage: &impl TokenStorage) -> Result<(), Box<dyn std::error::Error>> {
    /// let params = TokenParameters::builder("user-1", "access", Duration::minutes(30)).build()?;
    ///
    /// storage.save("signed.token.value", &params).await?;
    /// assert!(storage.exists("signed.token.value", &params).await?);
    /// # Ok(())
    /// # }
    /// ```
    async fn save(&self, token: &str, params: &TokenParameters) -> DomainResult<()>;

    /// Find the live token stored for the identity of `params`
    ///
    /// # Returns
    /// * `Ok(Some(token))` - Token found
    /// * `Ok(None)` - Nothing stored, removed, or expired
    /// * `Err(DomainError)` - Backend failure
    async fn get(&self, params: &TokenParameters) -> DomainResult<Option<String>>;

    /// Check whether exactly `token` is the live token for the identity of `params`
    ///
    /// A different live token under the same identity yields `false`.
    async fn exists(&self, token: &str, params: &TokenParameters) -> DomainResult<bool> {
        Ok(self.get(params).await?.as_deref() == Some(token))
    }

    /// Remove every stored entry whose value is `token`
    ///
    /// # Returns
    /// * `Ok(true)` - At least one entry was removed
    /// * `Ok(false)` - No entry held this token
    /// * `Err(DomainError)` - Backend failure
    async fn remove_token(&self, token: &str) -> DomainResult<bool>;

    /// Remove the entry stored for the identity of `params`
    ///
    /// # Returns
    /// * `Ok(true)` - An entry existed and was removed
    /// * `Ok(false)` - Nothing was stored
    /// * `Err(DomainError)` - Backend failure
    async fn remove(&self, params: &TokenParameters) -> DomainResult<bool>;
}
