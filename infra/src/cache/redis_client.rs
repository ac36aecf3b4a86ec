//! Redis cache client implementation
//!
//! This module provides a Redis client with connect retry logic and the
//! primitive operations the durable token storage is built on: atomic set with
//! absolute expiry, get, delete and server-side scripts.

use chrono::{DateTime, Utc};
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, Script};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use tk_shared::config::cache::CacheConfig;

use crate::InfrastructureError;

/// Redis cache client with a multiplexed connection and connect retry logic
///
/// Operations run once; only establishing the connection is retried.
/// Cloning is cheap and shares the underlying connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("url", &mask_url(&self.config.url))
            .finish()
    }
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Redis client or error
    ///
    /// # Example
    /// ```no_run
    /// use tk_infra::cache::{CacheConfig, RedisClient};
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let config = CacheConfig::new("redis://localhost:6379").with_max_connect_retries(5);
    ///     let client = RedisClient::new(config).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(
            "Creating Redis client with URL: {} (timeout {}s, {} attempts)",
            mask_url(&config.url),
            config.connection_timeout,
            config.max_connect_retries
        );

        // Parse Redis URL and create client
        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(client, &config).await?;

        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        config: &CacheConfig,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let max_attempts = config.max_connect_retries.max(1);
        let connect_timeout = config.connection_timeout();
        let mut attempts = 0;
        let mut delay = config.retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let attempt = timeout(connect_timeout, client.get_multiplexed_async_connection());
            let error = match attempt.await {
                Ok(Ok(connection)) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Ok(Err(e)) => InfrastructureError::Cache(e),
                Err(_) => InfrastructureError::Connection(format!(
                    "timed out after {}s",
                    connect_timeout.as_secs()
                )),
            };

            if attempts >= max_attempts {
                error!(
                    "Failed to connect to Redis after {} attempts: {}",
                    attempts, error
                );
                return Err(error);
            }

            warn!(
                "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                attempts, max_attempts, error, delay
            );
            sleep(Duration::from_millis(delay)).await;
            delay = next_retry_delay(delay);
        }
    }

    /// Set a value that expires at an absolute instant
    ///
    /// `SET` and `PEXPIREAT` run in one `MULTI` transaction, so the key never
    /// exists without its expiry. An instant in the past deletes the key.
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `value` - Value to store
    /// * `expires_at` - Instant the key disappears
    pub async fn set_with_expire_at(
        &self,
        key: &str,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), InfrastructureError> {
        debug!("Setting key '{}' expiring at {}", key, expires_at);
        let mut conn = self.connection.clone();
        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("SET")
            .arg(key)
            .arg(value)
            .ignore()
            .cmd("PEXPIREAT")
            .arg(key)
            .arg(expires_at.timestamp_millis())
            .ignore();

        match pipe.query_async::<_, ()>(&mut conn).await {
            Ok(()) => {
                debug!("Successfully set key '{}'", key);
                Ok(())
            }
            Err(e) => {
                error!("Failed to set key '{}': {}", key, e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    /// Get a value from cache
    ///
    /// # Returns
    /// * `Result<Option<String>, InfrastructureError>` - Cached value or None if not found
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Getting key '{}'", key);
        let mut conn = self.connection.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => {
                if value.is_some() {
                    debug!("Successfully retrieved key '{}'", key);
                } else {
                    debug!("Key '{}' not found", key);
                }
                Ok(value)
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    /// Delete a key from cache
    ///
    /// # Returns
    /// * `Result<bool, InfrastructureError>` - True if key was deleted, false if not found
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Deleting key '{}'", key);
        let mut conn = self.connection.clone();

        match conn.del::<_, u32>(key).await {
            Ok(deleted_count) => {
                let deleted = deleted_count > 0;
                if deleted {
                    debug!("Successfully deleted key '{}'", key);
                } else {
                    debug!("Key '{}' was not found", key);
                }
                Ok(deleted)
            }
            Err(e) => {
                error!("Failed to delete key '{}': {}", key, e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    /// Run a Lua script with the given arguments and no declared keys
    ///
    /// Sent as `EVALSHA`, falling back to `EVAL` when the server has not cached the script yet.
    pub async fn run_script<T: redis::FromRedisValue>(
        &self,
        script: &Script,
        args: &[&str],
    ) -> Result<T, InfrastructureError> {
        let mut conn = self.connection.clone();
        let mut invocation = script.prepare_invoke();
        for arg in args {
            invocation.arg(*arg);
        }

        invocation.invoke_async(&mut conn).await.map_err(|e| {
            error!("Failed to run Redis script: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    ///
    /// # Returns
    /// * `Result<bool, InfrastructureError>` - True if healthy, error otherwise
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");
        let mut conn = self.connection.clone();

        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(response) if response == "PONG" => {
                debug!("Redis health check passed");
                Ok(true)
            }
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!("Redis health check failed: {}", e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

/// Exponential backoff with cap at 5 seconds
pub(crate) fn next_retry_delay(delay_ms: u64) -> u64 {
    delay_ms.saturating_mul(2).min(5000)
}

/// Whether a Redis error means the server could not be reached
///
/// Everything else (type errors, script errors, server-side failures) is a backend error.
pub(crate) fn is_unavailable_error(error: &RedisError) -> bool {
    error.is_io_error()
        || error.is_connection_refusal()
        || error.is_connection_dropped()
        || error.is_timeout()
}

/// Mask sensitive parts of Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
