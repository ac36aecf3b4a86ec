//! Redis-backed token storage
//!
//! Stores one token per subject and type under the key produced by the
//! configured [`KeySchema`], with the key expiring at the token's expiry.

use std::sync::Arc;

use async_trait::async_trait;
use redis::Script;
use tracing::{debug, info};

use tk_core::domain::entities::token::TokenParameters;
use tk_core::errors::DomainResult;
use tk_core::repositories::token::{DefaultKeySchema, KeySchema, TokenStorage};

use super::redis_client::RedisClient;

/// Deletes every key matching `ARGV[1]` whose value equals `ARGV[2]`
///
/// Returns the number of deleted keys. Non-string keys under the pattern are skipped.
const REMOVE_TOKEN_SCRIPT: &str = r#"
local removed = 0
local cursor = "0"
repeat
    local page = redis.call("SCAN", cursor, "MATCH", ARGV[1], "COUNT", 100)
    cursor = page[1]
    for _, key in ipairs(page[2]) do
        if redis.call("TYPE", key).ok == "string" and redis.call("GET", key) == ARGV[2] then
            redis.call("DEL", key)
            removed = removed + 1
        end
    end
until cursor == "0"
return removed
"#;

/// Durable token storage on Redis
///
/// Expiry is delegated to Redis (`PEXPIREAT`), so expired tokens vanish without
/// any sweep on our side. Connectivity failures surface as
/// `StorageError::Unavailable`.
#[derive(Clone)]
pub struct RedisTokenStorage {
    client: RedisClient,
    schema: Arc<dyn KeySchema>,
    remove_token_script: Arc<Script>,
}

impl RedisTokenStorage {
    /// Create a storage using the default `tokens:<subject>:<type>` keys
    pub fn new(client: RedisClient) -> Self {
        Self::with_schema(client, DefaultKeySchema)
    }

    /// Create a storage using a custom key schema
    pub fn with_schema(client: RedisClient, schema: impl KeySchema + 'static) -> Self {
        Self {
            client,
            schema: Arc::new(schema),
            remove_token_script: Arc::new(Script::new(REMOVE_TOKEN_SCRIPT)),
        }
    }

    pub fn schema(&self) -> &dyn KeySchema {
        self.schema.as_ref()
    }
}

impl std::fmt::Debug for RedisTokenStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisTokenStorage")
            .field("client", &self.client)
            .field("key_pattern", &self.schema.key_pattern())
            .finish()
    }
}

#[async_trait]
impl TokenStorage for RedisTokenStorage {
    async fn save(&self, token: &str, params: &TokenParameters) -> DomainResult<()> {
        let key = self.schema.key_for(params);
        self.client
            .set_with_expire_at(&key, token, params.expires_at())
            .await?;
        Ok(())
    }

    async fn get(&self, params: &TokenParameters) -> DomainResult<Option<String>> {
        let key = self.schema.key_for(params);
        Ok(self.client.get(&key).await?)
    }

    async fn remove_token(&self, token: &str) -> DomainResult<bool> {
        let pattern = self.schema.key_pattern();
        let removed: u64 = self
            .client
            .run_script(&self.remove_token_script, &[pattern.as_str(), token])
            .await?;

        if removed > 0 {
            info!(removed, "Removed token entries from Redis");
        } else {
            debug!("No Redis entry held the token");
        }
        Ok(removed > 0)
    }

    async fn remove(&self, params: &TokenParameters) -> DomainResult<bool> {
        let key = self.schema.key_for(params);
        Ok(self.client.delete(&key).await?)
    }
}
