//! Tracing subscriber setup driven by [`LoggingConfig`]

use tracing::Subscriber;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter, Layer,
};

use tk_shared::config::{LogFormat, LoggingConfig};

use crate::InfrastructureError;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Fails if the level is
/// not a valid filter directive or a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| {
            InfrastructureError::Config(format!("Invalid log level '{}': {}", config.level, e))
        })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(config))
        .try_init()
        .map_err(|e| {
            InfrastructureError::Config(format!("Failed to install tracing subscriber: {}", e))
        })?;

    tracing::info!(
        level = %config.level,
        format = ?config.format,
        "Logging initialized"
    );
    Ok(())
}

fn fmt_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let base = fmt::layer()
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    match (config.format, config.timestamp) {
        (LogFormat::Json, true) => base.json().boxed(),
        (LogFormat::Json, false) => base.json().without_time().boxed(),
        (LogFormat::Pretty, true) => base.pretty().boxed(),
        (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
        (LogFormat::Compact, true) => base.compact().boxed(),
        (LogFormat::Compact, false) => base.compact().without_time().boxed(),
    }
}
