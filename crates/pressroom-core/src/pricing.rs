//! # Pricing Engine
//!
//! Computes the price of a configured print product in integer cents.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    calculate_price(qty, pricing, options)               │
//! │                                                                         │
//! │  qty <= 0 ? ──────────────────────────────────────────► 0 (guard)      │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  price = baseUnitPrice                     (f64, per unit)              │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  for family in [sides, paper, finish, dimensions]:                     │
//! │      price *= optionMultipliers[family][chosen]   (missing → ×1)       │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  best break = largest threshold <= qty                                 │
//! │      price *= break.multiplier                    (none → ×1)          │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  total = round_half_up(price × qty)       ◄── the ONLY rounding step   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example: 12 matte business cards
//! ```text
//! baseUnitPrice             1000
//! × paper "matte"           1.2   → 1200
//! × break [10, 0.9]         0.9   → 1080
//! × quantity                12    → 12960 cents
//! ```
//!
//! The engine never fails. An incomplete configuration (no quantity yet)
//! prices at zero and the caller withholds checkout until the total is
//! positive and at least `minimumPurchase`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Option Families
// =============================================================================

/// A named axis of product customization.
///
/// The declaration order is the order multipliers are applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OptionFamily {
    /// Single or double sided printing.
    Sides,
    /// Paper stock.
    Paper,
    /// Surface finish (gloss, matte, soft touch...).
    Finish,
    /// Trim size as `[width, height]`.
    Dimensions,
}

impl OptionFamily {
    /// All families in application order.
    pub const ALL: [OptionFamily; 4] = [
        OptionFamily::Sides,
        OptionFamily::Paper,
        OptionFamily::Finish,
        OptionFamily::Dimensions,
    ];

    /// Key used in `optionMultipliers`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OptionFamily::Sides => "sides",
            OptionFamily::Paper => "paper",
            OptionFamily::Finish => "finish",
            OptionFamily::Dimensions => "dimensions",
        }
    }
}

impl fmt::Display for OptionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Dimensions
// =============================================================================

/// Trim size `[width, height]`, serialized as a two element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Dimensions(pub f64, pub f64);

impl Dimensions {
    /// Returns the key this size is stored under in `optionMultipliers`.
    ///
    /// The catalog stores size multipliers under the JSON text of the pair,
    /// as a JavaScript client writes it: integral values have no fraction.
    ///
    /// ## Example
    /// ```rust
    /// use pressroom_core::pricing::Dimensions;
    ///
    /// assert_eq!(Dimensions(3.5, 2.0).lookup_key(), "[3.5,2]");
    /// assert_eq!(Dimensions(8.5, 11.0).lookup_key(), "[8.5,11]");
    /// ```
    pub fn lookup_key(&self) -> String {
        format!("[{},{}]", js_number(self.0), js_number(self.1))
    }
}

/// Formats a number the way `JSON.stringify` does: shortest round-trip
/// digits, exponent form outside `[1e-6, 1e21)`.
fn js_number(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_string();
    }
    // -0 prints as 0 in JavaScript
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", value);
    }
    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

// =============================================================================
// Order Options
// =============================================================================

/// The options a buyer picked for one line item.
///
/// Sparse: any family may be absent. Values for `sides`, `paper` and
/// `finish` are the catalog's option tokens (e.g. `"double"`, `"matte"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderProductOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub sides: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub paper: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub finish: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub dimensions: Option<Dimensions>,
}

impl OrderProductOptions {
    /// Returns `(family, lookup key)` for every chosen option, in
    /// application order.
    pub fn selections(&self) -> Vec<(OptionFamily, String)> {
        OptionFamily::ALL
            .iter()
            .filter_map(|family| self.lookup_key(*family).map(|key| (*family, key)))
            .collect()
    }

    /// Returns the lookup key of the value chosen for `family`, if any.
    pub fn lookup_key(&self, family: OptionFamily) -> Option<String> {
        match family {
            OptionFamily::Sides => self.sides.clone(),
            OptionFamily::Paper => self.paper.clone(),
            OptionFamily::Finish => self.finish.clone(),
            OptionFamily::Dimensions => self.dimensions.map(|d| d.lookup_key()),
        }
    }
}

// =============================================================================
// Pricing Table
// =============================================================================

/// A quantity break: orders of at least `threshold` units get `multiplier`.
///
/// Serialized as `[threshold, multiplier]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuantityBreak(#[ts(type = "number")] pub i64, pub f64);

impl QuantityBreak {
    pub fn threshold(&self) -> i64 {
        self.0
    }

    pub fn multiplier(&self) -> f64 {
        self.1
    }
}

/// Pricing data of one catalog product.
///
/// ## JSON Shape
/// ```json
/// {
///   "baseUnitPrice": 1000,
///   "minimumPurchase": 2500,
///   "optionMultipliers": {
///     "paper": { "matte": 1.2, "gloss": 1.1 },
///     "dimensions": { "[3.5,2]": 1.0, "[8.5,11]": 1.8 }
///   },
///   "quantityDiscountMultipliers": [[100, 0.9], [500, 0.85]]
/// }
/// ```
///
/// Families are keyed by string so a catalog may carry families this engine
/// does not (yet) offer; they are simply never consulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductPricing {
    /// Price of one unit with no options, in cents.
    pub base_unit_price: Money,

    /// Smallest acceptable order total, in cents. Enforced by the caller.
    #[serde(default)]
    pub minimum_purchase: Money,

    /// family → option value → multiplier.
    #[serde(default)]
    pub option_multipliers: BTreeMap<String, BTreeMap<String, f64>>,

    /// Quantity breaks in storage order (unsorted).
    #[serde(default)]
    pub quantity_discount_multipliers: Vec<QuantityBreak>,
}

impl ProductPricing {
    /// Creates a table with only a base price.
    pub fn new(base_unit_price: Money) -> Self {
        ProductPricing {
            base_unit_price,
            ..Default::default()
        }
    }

    /// Sets the multiplier for one option value.
    pub fn set_multiplier(&mut self, family: &str, value: &str, multiplier: f64) {
        self.option_multipliers
            .entry(family.to_string())
            .or_default()
            .insert(value.to_string(), multiplier);
    }

    /// Looks up the multiplier for a chosen option value.
    ///
    /// `None` means "no adjustment": either the family or the value is not
    /// priced.
    pub fn option_multiplier(&self, family: OptionFamily, key: &str) -> Option<f64> {
        self.option_multipliers
            .get(family.as_str())
            .and_then(|values| values.get(key))
            .copied()
    }

    /// Returns the quantity break that applies to `quantity`.
    ///
    /// The break with the largest threshold not above `quantity` wins. If
    /// several breaks share that threshold the one declared first wins (the
    /// descending sort is stable).
    pub fn quantity_break(&self, quantity: i64) -> Option<QuantityBreak> {
        let mut breaks = self.quantity_discount_multipliers.clone();
        breaks.sort_by(|a, b| b.threshold().cmp(&a.threshold()));
        breaks.into_iter().find(|b| quantity >= b.threshold())
    }

    /// Checks a computed total against the checkout rules: it must be
    /// computable (non-zero) and at least `minimumPurchase`.
    pub fn meets_minimum(&self, total: Money) -> bool {
        total.is_positive() && total >= self.minimum_purchase
    }
}

// =============================================================================
// Price Quote
// =============================================================================

/// A multiplier that was applied for a chosen option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppliedMultiplier {
    pub family: OptionFamily,
    pub value: String,
    pub multiplier: f64,
}

/// Full breakdown of one price calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceQuote {
    #[ts(type = "number")]
    pub quantity: i64,

    /// Option multipliers that matched, in application order.
    pub applied_options: Vec<AppliedMultiplier>,

    /// Quantity break that matched, if any.
    pub quantity_break: Option<QuantityBreak>,

    /// Per-unit price after all multipliers, before rounding.
    pub unit_price: f64,

    /// Rounded total for the whole quantity.
    pub total: Money,
}

impl PriceQuote {
    fn not_computable(quantity: i64) -> Self {
        PriceQuote {
            quantity,
            applied_options: Vec::new(),
            quantity_break: None,
            unit_price: 0.0,
            total: Money::zero(),
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Computes the total price in cents for `quantity` units.
///
/// Returns zero when `quantity` is not positive. See the module docs for the
/// pipeline.
///
/// ## Example
/// ```rust
/// use pressroom_core::money::Money;
/// use pressroom_core::pricing::{calculate_price, OrderProductOptions, ProductPricing, QuantityBreak};
///
/// let mut pricing = ProductPricing::new(Money::from_cents(100));
/// pricing.quantity_discount_multipliers = vec![
///     QuantityBreak(100, 0.9),
///     QuantityBreak(500, 0.85),
///     QuantityBreak(1000, 0.8),
/// ];
///
/// let total = calculate_price(750, &pricing, &OrderProductOptions::default());
/// assert_eq!(total.cents(), 63750);
/// ```
pub fn calculate_price(
    quantity: i64,
    pricing: &ProductPricing,
    options: &OrderProductOptions,
) -> Money {
    quote_price(quantity, pricing, options).total
}

/// Computes the price and reports which multipliers were applied.
pub fn quote_price(
    quantity: i64,
    pricing: &ProductPricing,
    options: &OrderProductOptions,
) -> PriceQuote {
    if quantity <= 0 {
        return PriceQuote::not_computable(quantity);
    }

    let mut price = pricing.base_unit_price.cents() as f64;
    let mut applied_options = Vec::new();

    for (family, key) in options.selections() {
        if let Some(multiplier) = pricing.option_multiplier(family, &key) {
            price *= multiplier;
            applied_options.push(AppliedMultiplier {
                family,
                value: key,
                multiplier,
            });
        }
    }

    let quantity_break = pricing.quantity_break(quantity);
    if let Some(brk) = quantity_break {
        price *= brk.multiplier();
    }

    PriceQuote {
        quantity,
        applied_options,
        quantity_break,
        unit_price: price,
        total: Money::round_half_up(price * quantity as f64),
    }
}

/// Normalizes a quantity received from an untrusted client.
///
/// Anything that is not a positive whole number (fractions, NaN, values
/// beyond `i64`) maps to `0`, which prices as "not computable".
///
/// ## Example
/// ```rust
/// use pressroom_core::pricing::normalize_quantity;
///
/// assert_eq!(normalize_quantity(250.0), 250);
/// assert_eq!(normalize_quantity(2.5), 0);
/// assert_eq!(normalize_quantity(-3.0), 0);
/// ```
pub fn normalize_quantity(raw: f64) -> i64 {
    if !raw.is_finite() || raw.fract() != 0.0 || raw <= 0.0 || raw >= i64::MAX as f64 {
        return 0;
    }
    raw as i64
}

// =============================================================================
// Unit Tests
// =============================================================================
