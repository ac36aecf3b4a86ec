//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for tokenkeep. It provides
//! the durable Redis token storage, tracing setup and the wiring that turns
//! an [`AppConfig`] into ready-to-use token services.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: Redis client and the Redis-backed `TokenStorage`
//! - **Logging**: `tracing-subscriber` initialisation from `LoggingConfig`

use std::sync::Arc;

use tk_core::errors::{DomainError, StorageError};
use tk_core::repositories::token::NamespacedKeySchema;
use tk_core::services::token::{PersistentTokenService, TokenServiceConfig};
use tk_shared::config::{AppConfig, Environment};

/// Cache module - Redis client and durable token storage
pub mod cache;

/// Logging module - tracing subscriber setup
pub mod logging;

pub use cache::{RedisClient, RedisTokenStorage};
pub use logging::init_tracing;

/// Token service backed by Redis
pub type RedisTokenService = PersistentTokenService<RedisTokenStorage>;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    token_service: Arc<RedisTokenService>,
    config: AppConfig,
}

impl InfrastructureServices {
    /// Connect to Redis and build the token service described by `config`
    ///
    /// Refuses to start a production environment that still signs with the
    /// default secret.
    pub async fn from_config(config: AppConfig) -> Result<Self, InfrastructureError> {
        if config.environment.is_production() && config.token.is_using_default_secret() {
            return Err(InfrastructureError::Config(
                "the default token secret must not be used in production".to_string(),
            ));
        }

        let client = RedisClient::new(config.cache.clone()).await?;
        if !client.health_check().await? {
            return Err(InfrastructureError::Connection(
                "Redis answered PING with an unexpected reply".to_string(),
            ));
        }

        let storage = match &config.token.key_namespace {
            Some(namespace) => {
                RedisTokenStorage::with_schema(client, NamespacedKeySchema::new(namespace.clone()))
            }
            None => RedisTokenStorage::new(client),
        };
        let token_service =
            PersistentTokenService::new(storage, &TokenServiceConfig::from(&config.token))?;

        Ok(Self {
            token_service: Arc::new(token_service),
            config,
        })
    }

    pub fn token_service(&self) -> Arc<RedisTokenService> {
        Arc::clone(&self.token_service)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Initialize infrastructure services
///
/// This function:
/// - Loads the environment-specific `.env` file, then `.env`
/// - Loads the layered [`AppConfig`]
/// - Connects to Redis and checks it answers `PING`
/// - Builds the Redis-backed token service
pub async fn initialize() -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!("Initializing infrastructure services...");

    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::load()
        .map_err(|e| InfrastructureError::Config(format!("Failed to load configuration: {}", e)))?;
    tracing::info!(environment = %config.environment, "Configuration loaded");

    let services = InfrastructureServices::from_config(config).await?;

    tracing::info!("Infrastructure services initialized successfully");
    Ok(services)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(e) if cache::redis_client::is_unavailable_error(&e) => {
                StorageError::Unavailable {
                    message: e.to_string(),
                }
                .into()
            }
            InfrastructureError::Cache(e) => StorageError::Backend {
                message: e.to_string(),
            }
            .into(),
            InfrastructureError::Connection(message) => StorageError::Unavailable { message }.into(),
            InfrastructureError::Config(message) => DomainError::Internal {
                message: format!("Configuration error: {}", message),
            },
            InfrastructureError::Domain(e) => e,
        }
    }
}
