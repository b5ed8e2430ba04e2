//! # Pricing Handlers
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product page: customer picks paper, finish, size, quantity            │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  POST /quote { quantity: 250, options: { paper: "matte" } }            │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  quote_line_item(pricing, request) ← THIS MODULE                       │
//! │                    │                                                    │
//! │                    ├── totalPrice = 0 → "configure your product"       │
//! │                    ├── meetsMinimum = false → checkout disabled        │
//! │                    └── otherwise → add to cart enabled                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pressroom_core::pricing::{normalize_quantity, quote_price};
use pressroom_core::{Money, OrderProductOptions, ProductPricing};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

/// Quote request from the product page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuoteRequest {
    /// Raw quantity as sent by the client; fractions price as zero.
    pub quantity: f64,

    #[serde(default)]
    pub options: OrderProductOptions,
}

/// Quote response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItemQuote {
    #[ts(type = "number")]
    pub quantity: i64,

    /// Total in cents; zero when the configuration is not computable.
    pub total_price: Money,

    pub minimum_purchase: Money,

    /// Whether checkout may proceed with this line.
    pub meets_minimum: bool,
}

/// Prices one configured line item.
///
/// Never fails: an unusable quantity prices as zero and `meetsMinimum` is
/// false.
pub fn quote_line_item(pricing: &ProductPricing, request: &QuoteRequest) -> LineItemQuote {
    let quantity = normalize_quantity(request.quantity);
    let quote = quote_price(quantity, pricing, &request.options);

    debug!(
        quantity,
        applied_options = quote.applied_options.len(),
        quantity_break = ?quote.quantity_break,
        total_cents = quote.total.cents(),
        "Quoted line item"
    );

    LineItemQuote {
        quantity,
        total_price: quote.total,
        minimum_purchase: pricing.minimum_purchase,
        meets_minimum: pricing.meets_minimum(quote.total),
    }
}
