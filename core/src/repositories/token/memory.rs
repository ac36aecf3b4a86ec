//! In-process implementation of TokenStorage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::TokenParameters;
use crate::errors::DomainResult;

use super::key_schema::{DefaultKeySchema, KeySchema};
use super::r#trait::TokenStorage;

#[derive(Debug, Clone)]
struct StoredToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl StoredToken {
    fn is_live_at(&self, at: DateTime<Utc>) -> bool {
        self.expires_at > at
    }
}

/// Token storage held in process memory
///
/// Entries disappear at their expiry: reads treat an expired entry as absent
/// and drop it. Nothing survives a restart.
#[derive(Clone)]
pub struct InMemoryTokenStorage {
    tokens: Arc<RwLock<HashMap<String, StoredToken>>>,
    schema: Arc<dyn KeySchema>,
}

impl InMemoryTokenStorage {
    /// Create an empty storage using the default key schema
    pub fn new() -> Self {
        Self::with_schema(DefaultKeySchema)
    }

    /// Create an empty storage using a custom key schema
    pub fn with_schema(schema: impl KeySchema + 'static) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            schema: Arc::new(schema),
        }
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        let tokens = self.tokens.read().await;
        tokens.values().filter(|t| t.is_live_at(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every expired entry, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|_, stored| stored.is_live_at(now));

        initial_count - tokens.len()
    }
}

impl Default for InMemoryTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryTokenStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTokenStorage").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenStorage for InMemoryTokenStorage {
    async fn save(&self, token: &str, params: &TokenParameters) -> DomainResult<()> {
        let key = self.schema.key_for(params);
        let mut tokens = self.tokens.write().await;

        tokens.insert(
            key,
            StoredToken {
                token: token.to_string(),
                expires_at: params.expires_at(),
            },
        );
        Ok(())
    }

    async fn get(&self, params: &TokenParameters) -> DomainResult<Option<String>> {
        let key = self.schema.key_for(params);
        let now = Utc::now();

        {
            let tokens = self.tokens.read().await;
            match tokens.get(&key) {
                None => return Ok(None),
                Some(stored) if stored.is_live_at(now) => return Ok(Some(stored.token.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it unless a fresh save replaced it meanwhile
        let mut tokens = self.tokens.write().await;
        if tokens.get(&key).is_some_and(|stored| !stored.is_live_at(now)) {
            tokens.remove(&key);
        }
        Ok(None)
    }

    async fn remove_token(&self, token: &str) -> DomainResult<bool> {
        let now = Utc::now();
        let mut tokens = self.tokens.write().await;
        let mut removed_live = false;

        tokens.retain(|_, stored| {
            if stored.token != token {
                return true;
            }
            removed_live |= stored.is_live_at(now);
            false
        });

        Ok(removed_live)
    }

    async fn remove(&self, params: &TokenParameters) -> DomainResult<bool> {
        let key = self.schema.key_for(params);
        let now = Utc::now();
        let mut tokens = self.tokens.write().await;

        Ok(tokens
            .remove(&key)
            .is_some_and(|stored| stored.is_live_at(now)))
    }
}
