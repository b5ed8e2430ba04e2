//! # pressroom-core: Pure Pricing & Promotion Logic
//!
//! This crate is the computational heart of the Pressroom print-shop
//! storefront. It contains the pricing engine, the promotion eligibility
//! evaluator and the promotion schema validator as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Pressroom Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront / Admin (Next.js)                    │   │
//! │  │    Product page ──► Cart ──► Promotion toasts ──► Admin forms   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 pressroom-storefront (handlers)                 │   │
//! │  │    quote_line_item, eligible_promotions, create_promotion ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ pressroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌─────────────┐  ┌──────────┐  │   │
//! │  │   │  pricing  │  │   money   │  │ promotions  │  │validation│  │   │
//! │  │   │ multiplier│  │   Money   │  │ eligibility │  │  fields  │  │   │
//! │  │   │ qty break │  │  rounding │  │   schema    │  │          │  │   │
//! │  │   └───────────┘  └───────────┘  └─────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - Product pricing engine (option multipliers, quantity breaks)
//! - [`money`] - Money type in integer cents, JS-compatible rounding
//! - [`promotions`] - Promotion model, eligibility, schema validation, redemption
//! - [`validation`] - Field-level validators shared by the schema checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: Prices leave the engine as integer cents
//! 4. **Collected Errors**: Promotion validation reports every violation at once
//!
//! ## Example Usage
//!
//! ```rust
//! use pressroom_core::money::Money;
//! use pressroom_core::pricing::{calculate_price, OrderProductOptions, ProductPricing, QuantityBreak};
//!
//! let mut pricing = ProductPricing::new(Money::from_cents(1000));
//! pricing.set_multiplier("paper", "matte", 1.2);
//! pricing.quantity_discount_multipliers.push(QuantityBreak(10, 0.9));
//!
//! let options = OrderProductOptions {
//!     paper: Some("matte".to_string()),
//!     ..Default::default()
//! };
//!
//! // round(1000 × 1.2 × 0.9 × 12)
//! assert_eq!(calculate_price(12, &pricing, &options).cents(), 12960);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod promotions;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pressroom_core::Money` instead of
// `use pressroom_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use money::Money;
pub use pricing::{calculate_price, quote_price, OrderProductOptions, PriceQuote, ProductPricing};
pub use promotions::eligibility::{check_eligibility, CartLine, CartSnapshot, LoyaltyAccount};
pub use promotions::redemption::{redeem, Redemption};
pub use promotions::schema::{validate_promotion, PromotionCandidate, ValidPromotion, ValidationContext};
pub use promotions::{Promotion, PromotionCondition, PromotionReward, PromotionStatus, PromotionType};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minor units per major currency unit.
///
/// `min_order_value` conditions are authored in whole currency units while
/// cart totals are in cents; this is the conversion factor between the two.
pub const MINOR_UNITS_PER_MAJOR: f64 = 100.0;

/// Maximum length of a promotion title.
pub const MAX_PROMOTION_TITLE_LEN: usize = 100;

/// Maximum length of a promotion description.
pub const MAX_PROMOTION_DESCRIPTION_LEN: usize = 500;
