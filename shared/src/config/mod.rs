//! Configuration module with sub-modules per concern
//!
//! - `token` - Token signing secret, lifetimes and storage key namespace
//! - `cache` - Redis connection configuration
//! - `environment` - Environment detection and logging configuration

pub mod cache;
pub mod environment;
pub mod token;

use ::config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use token::TokenConfig;

/// Prefix of the environment variables read by [`AppConfig::load`]
///
/// Nested keys are separated by a double underscore, e.g.
/// `TOKENKEEP_TOKEN__SECRET` or `TOKENKEEP_CACHE__URL`.
pub const ENV_PREFIX: &str = "TOKENKEEP";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Token configuration
    #[serde(default)]
    pub token: TokenConfig,

    /// Redis cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Create the default configuration for an environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            token: TokenConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load layered configuration for the detected environment
    ///
    /// Sources, lowest priority first:
    /// 1. defaults for the environment
    /// 2. the optional `config.<environment>.toml` file
    /// 3. `TOKENKEEP_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_for(Environment::from_env())
    }

    /// Load layered configuration for an explicit environment
    pub fn load_for(environment: Environment) -> Result<Self, ConfigError> {
        let defaults = Config::try_from(&Self::for_environment(environment))?;

        let mut loaded: Self = Config::builder()
            .add_source(defaults)
            .add_source(File::with_name(environment.config_file()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.environment = environment;
        Ok(loaded)
    }
}
