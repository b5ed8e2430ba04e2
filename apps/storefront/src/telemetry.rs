//! Tracing subscriber setup.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages, overrides the configuration
//! - `RUST_LOG=pressroom_storefront=trace` - Trace for this crate only
//! - Default: `PRESSROOM_LOG_LEVEL`, or `info`

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, StorefrontConfig};

/// Errors raised while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    #[error("Tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set and valid.
pub fn init_tracing(config: &StorefrontConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&config.log_level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.log_format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    installed.map_err(|e| TelemetryError::AlreadyInstalled(e.to_string()))?;

    tracing::info!(
        format = %config.log_format,
        level = %config.log_level,
        "Tracing initialized"
    );
    Ok(())
}

/// Parses `EnvFilter` directives such as `info,pressroom_storefront=debug`.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, TelemetryError> {
    Ok(EnvFilter::try_new(directives)?)
}
