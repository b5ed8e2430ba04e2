//! Storefront configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                                  | Default  |
//! |-------------------------------------------|----------|
//! | `PRESSROOM_LOG_LEVEL`                     | `info`   |
//! | `PRESSROOM_LOG_FORMAT`                    | `pretty` |
//! | `PRESSROOM_CURRENCY`                      | `USD`    |
//! | `PRESSROOM_MAX_CART_LINES`                | `100`    |
//! | `PRESSROOM_ENFORCE_FUTURE_START_ON_UPDATE`| `false`  |

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Log output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human friendly.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(ConfigError::InvalidValue("PRESSROOM_LOG_FORMAT".to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Compact => f.write_str("compact"),
        }
    }
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub log_level: String,

    /// Log output style
    pub log_format: LogFormat,

    /// ISO 4217 code of the currency prices are quoted in
    pub currency: String,

    /// Largest cart accepted by the promotion endpoints
    pub max_cart_lines: usize,

    /// Apply the future start date rule to edits as well as creates
    pub enforce_future_start_on_update: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            currency: "USD".to_string(),
            max_cart_lines: 100,
            enforce_future_start_on_update: false,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StorefrontConfig::default();

        let config = StorefrontConfig {
            log_level: lookup("PRESSROOM_LOG_LEVEL").unwrap_or(defaults.log_level),

            log_format: match lookup("PRESSROOM_LOG_FORMAT") {
                Some(raw) => raw.parse()?,
                None => defaults.log_format,
            },

            currency: lookup("PRESSROOM_CURRENCY")
                .map(|raw| raw.trim().to_ascii_uppercase())
                .unwrap_or(defaults.currency),

            max_cart_lines: lookup("PRESSROOM_MAX_CART_LINES")
                .unwrap_or_else(|| defaults.max_cart_lines.to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PRESSROOM_MAX_CART_LINES".to_string()))?,

            enforce_future_start_on_update: lookup("PRESSROOM_ENFORCE_FUTURE_START_ON_UPDATE")
                .unwrap_or_else(|| defaults.enforce_future_start_on_update.to_string())
                .trim()
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("PRESSROOM_ENFORCE_FUTURE_START_ON_UPDATE".to_string())
                })?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::InvalidValue("PRESSROOM_CURRENCY".to_string()));
        }

        if self.max_cart_lines == 0 {
            return Err(ConfigError::InvalidValue("PRESSROOM_MAX_CART_LINES".to_string()));
        }

        Ok(())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
