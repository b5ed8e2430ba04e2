//! # Pressroom Storefront
//!
//! Request handlers for the print-shop storefront and its promotion admin.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Handlers                               │
//! │                                                                         │
//! │  ┌────────────────────────┐  ┌──────────────────────────────────────┐  │
//! │  │  handlers::pricing     │  │  handlers::promotions                │  │
//! │  │                        │  │                                      │  │
//! │  │ • quote_line_item      │  │ • eligible_promotions                │  │
//! │  │                        │  │ • create / update / get / list       │  │
//! │  │                        │  │ • activate / end / delete            │  │
//! │  │                        │  │ • redeem_promotion                   │  │
//! │  └───────────┬────────────┘  └──────────────────┬───────────────────┘  │
//! │              │                                  │                       │
//! │              ▼                                  ▼                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  pressroom-core (pure)          PromotionStore (Arc<RwLock>)     │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers are plain functions over a [`Storefront`]; the HTTP framework
//! maps `ApiError::status()` and `ApiError::body()` onto its response type.
//!
//! ## Configuration
//! See [`config`] for the `PRESSROOM_*` environment variables.

pub mod config;
pub mod error;
pub mod handlers;
pub mod store;
pub mod telemetry;

// Re-exports
pub use config::StorefrontConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use store::PromotionStore;

/// Shared application state.
#[derive(Debug, Clone, Default)]
pub struct Storefront {
    pub config: StorefrontConfig,
    pub promotions: PromotionStore,
}

impl Storefront {
    pub fn new(config: StorefrontConfig, promotions: PromotionStore) -> Self {
        Storefront { config, promotions }
    }

    /// Loads configuration from the environment, installs tracing and
    /// starts with an empty promotion store.
    pub fn bootstrap() -> Result<Self, BootstrapError> {
        let config = StorefrontConfig::load()?;
        telemetry::init_tracing(&config)?;
        tracing::info!(
            currency = %config.currency,
            max_cart_lines = config.max_cart_lines,
            "Storefront configured"
        );
        Ok(Storefront::new(config, PromotionStore::new()))
    }
}

/// Startup failures.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Telemetry(#[from] telemetry::TelemetryError),
}
