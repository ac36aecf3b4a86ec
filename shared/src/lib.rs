//! Shared configuration for the tokenkeep workspace
//!
//! This crate provides the configuration types used across all modules:
//! - Token signing and lifetime configuration
//! - Redis cache configuration
//! - Environment detection and logging configuration

pub mod config;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, Environment, LogFormat, LoggingConfig, TokenConfig,
};
