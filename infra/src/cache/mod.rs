//! Cache module for Redis-based token storage
//!
//! This module provides the Redis client and the durable token storage built on it.

pub mod redis_client;
pub mod token_storage;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use token_storage::RedisTokenStorage;

// Re-export commonly used types
pub use tk_shared::config::cache::CacheConfig;
