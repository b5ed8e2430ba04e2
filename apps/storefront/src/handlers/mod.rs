//! # Handlers
//!
//! Framework-agnostic request handlers.
//!
//! - [`pricing`] - Line item quotes for the product page and cart
//! - [`promotions`] - Eligibility, admin CRUD, lifecycle and redemption
//!
//! Every handler takes the caller's clock (`now`) instead of reading it, so
//! one request sees one instant.

pub mod pricing;
pub mod promotions;

pub use pricing::{quote_line_item, LineItemQuote, QuoteRequest};
pub use promotions::{
    activate_promotion, create_promotion, delete_promotion, eligible_promotions, end_promotion,
    get_promotion, list_promotions, redeem_promotion, update_promotion,
};
