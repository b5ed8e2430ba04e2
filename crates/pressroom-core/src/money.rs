//! # Money Module
//!
//! Provides the `Money` type for monetary values in integer cents.
//!
//! ## Where Floats Are Allowed
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FLOAT ZONE vs INTEGER ZONE                                             │
//! │                                                                         │
//! │  Pricing multipliers are catalog data (1.1 for gloss, 0.9 for 100+)   │
//! │  so the running price inside the engine is an f64:                     │
//! │                                                                         │
//! │    100 × 1.1 = 110.00000000000001                                      │
//! │                                                                         │
//! │  The float NEVER leaves the engine. It is rounded exactly once with    │
//! │  Money::round_half_up and from then on only integer cents exist:       │
//! │                                                                         │
//! │    Money::round_half_up(110.00000000000001) → 110 cents                │
//! │                                                                         │
//! │  Rounding after each multiplication would drift by a cent for some    │
//! │  inputs, which is why there is no "multiply Money by f64" operator.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pressroom_core::money::Money;
//!
//! let unit = Money::from_cents(1099); // $10.99
//! let line = unit * 3;                // $32.97
//! assert_eq!(line.cents(), 3297);
//!
//! let total: Money = [line, Money::from_cents(3)].into_iter().sum();
//! assert_eq!(total.to_string(), "$33.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

use crate::MINOR_UNITS_PER_MAJOR;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// Serializes as a bare integer, which is the wire format for every price
/// field (`baseUnitPrice`, `minimumPurchase`, `totalPrice`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Converts an unrounded amount of cents into Money.
    ///
    /// Rounds half toward positive infinity, matching JavaScript's
    /// `Math.round`: `2.5 → 3`, `-2.5 → -2`. Non-finite input yields zero;
    /// values beyond the `i64` range saturate.
    ///
    /// ## Example
    /// ```rust
    /// use pressroom_core::money::Money;
    ///
    /// assert_eq!(Money::round_half_up(63749.5).cents(), 63750);
    /// assert_eq!(Money::round_half_up(12960.000000000002).cents(), 12960);
    /// assert_eq!(Money::round_half_up(-0.5).cents(), 0);
    /// ```
    pub fn round_half_up(raw_cents: f64) -> Self {
        if !raw_cents.is_finite() {
            return Money::zero();
        }

        let floor = raw_cents.floor();
        let rounded = if raw_cents - floor >= 0.5 {
            floor + 1.0
        } else {
            floor
        };

        // `as` saturates at the i64 bounds
        Money(rounded as i64)
    }

    /// Checks whether this amount reaches a threshold given in whole
    /// currency units (e.g. `50` meaning $50.00).
    ///
    /// ## Example
    /// ```rust
    /// use pressroom_core::money::Money;
    ///
    /// assert!(Money::from_cents(5000).reaches_major(50.0));
    /// assert!(!Money::from_cents(4999).reaches_major(50.0));
    /// ```
    pub fn reaches_major(&self, major_units: f64) -> bool {
        self.0 as f64 >= major_units * MINOR_UNITS_PER_MAJOR
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

// Arithmetic saturates at the i64 bounds.

/// Debug-style display. The storefront formats prices for the UI itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Multiplication by an integer quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_round_half_up_matches_math_round() {
        assert_eq!(Money::round_half_up(0.5).cents(), 1);
        assert_eq!(Money::round_half_up(1.5).cents(), 2);
        assert_eq!(Money::round_half_up(2.5).cents(), 3);
        assert_eq!(Money::round_half_up(2.4999).cents(), 2);
        assert_eq!(Money::round_half_up(-2.5).cents(), -2);
        assert_eq!(Money::round_half_up(-2.6).cents(), -3);
    }

    #[test]
    fn test_round_half_up_absorbs_float_drift() {
        let raw = 100.0 * 1.1;
        assert_ne!(raw, 110.0);
        assert_eq!(Money::round_half_up(raw).cents(), 110);

        let raw = 1000.0 * 1.2 * 0.9 * 12.0;
        assert_eq!(Money::round_half_up(raw).cents(), 12960);
    }

    #[test]
    fn test_round_half_up_non_finite() {
        assert_eq!(Money::round_half_up(f64::NAN), Money::zero());
        assert_eq!(Money::round_half_up(f64::INFINITY), Money::zero());
    }

    #[test]
    fn test_reaches_major() {
        assert!(Money::from_cents(5000).reaches_major(50.0));
        assert!(!Money::from_cents(4999).reaches_major(50.0));
        assert!(Money::from_cents(4999).reaches_major(49.99));
        assert!(Money::zero().reaches_major(0.0));
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a * 3).cents(), 3000);

        let mut c = a;
        c += b;
        assert_eq!(c.cents(), 1500);

        let total: Money = [a, b, c].iter().sum();
        assert_eq!(total.cents(), 3000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(max * 2, max);
        assert_eq!(Money::from_cents(i64::MIN) * 2, Money::from_cents(i64::MIN));

        let mut c = max;
        c += Money::from_cents(1);
        assert_eq!(c, max);

        let total: Money = [max, Money::from_cents(1)].into_iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_cents(12960)).unwrap();
        assert_eq!(json, "12960");

        let back: Money = serde_json::from_str("63750").unwrap();
        assert_eq!(back.cents(), 63750);
    }
}
