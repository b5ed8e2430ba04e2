//! # Promotion Eligibility
//!
//! Filters a snapshot of active promotions down to the ones the current
//! customer can redeem against the current cart.
//!
//! ## Decision per Promotion
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   customer present? ── no ──► excluded (even when pointsCost = 0)      │
//! │        │ yes                                                            │
//! │        ▼                                                                │
//! │   pointsCost ≤ unspentLoyaltyPoints? ── no ──► excluded                │
//! │        │ yes                                                            │
//! │        ▼                                                                │
//! │   every condition holds? ── no ──► excluded                            │
//! │        │ yes                                                            │
//! │        ▼                                                                │
//! │   included (input order kept)                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{Promotion, PromotionCondition, TierLevel};
use crate::money::Money;

// =============================================================================
// Inputs
// =============================================================================

/// The signed-in customer's loyalty standing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LoyaltyAccount {
    #[ts(type = "number")]
    pub unspent_loyalty_points: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub tier: Option<TierLevel>,
}

impl LoyaltyAccount {
    pub fn with_points(points: i64) -> Self {
        LoyaltyAccount {
            unspent_loyalty_points: points,
            tier: None,
        }
    }
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub product_id: String,
    #[ts(type = "number")]
    pub quantity: i64,
    /// Line total as computed by the pricing engine.
    pub total_price: Money,
}

/// A consistent view of the cart for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSnapshot {
    #[serde(default)]
    pub items: Vec<CartLine>,
}

impl CartSnapshot {
    pub fn new(items: Vec<CartLine>) -> Self {
        CartSnapshot { items }
    }

    /// Sum of line totals, saturating at the `i64` bounds.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(|line| line.total_price).sum()
    }

    /// Number of line items (not units).
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if any line's product is in `product_ids`.
    pub fn contains_any(&self, product_ids: &[String]) -> bool {
        self.items
            .iter()
            .any(|line| product_ids.iter().any(|id| *id == line.product_id))
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Points affordability. An absent customer can afford nothing.
pub fn can_afford(account: Option<&LoyaltyAccount>, promotion: &Promotion) -> bool {
    match account {
        None => false,
        Some(_) if promotion.points_cost <= 0 => true,
        Some(account) => account.unspent_loyalty_points >= promotion.points_cost,
    }
}

/// Evaluates one condition against the cart.
pub fn condition_satisfied(condition: &PromotionCondition, cart: &CartSnapshot) -> bool {
    match condition {
        PromotionCondition::MinOrderValue(major_units) => {
            cart.total_price().reaches_major(*major_units)
        }
        PromotionCondition::MinOrderCount(count) => cart.item_count() as f64 >= *count,
        PromotionCondition::SpecificProducts(product_ids) => cart.contains_any(product_ids),
        // Streak history is not part of the cart.
        PromotionCondition::OrderStreak(_) => false,
    }
}

/// Returns true when the customer can afford `promotion` and the cart meets
/// all of its conditions.
pub fn is_eligible(
    account: Option<&LoyaltyAccount>,
    cart: &CartSnapshot,
    promotion: &Promotion,
) -> bool {
    can_afford(account, promotion)
        && promotion
            .conditions
            .iter()
            .all(|condition| condition_satisfied(condition, cart))
}

/// Filters `promotions` to the ones the customer is eligible for, keeping
/// their input order.
///
/// ## Example
/// ```rust
/// use pressroom_core::{check_eligibility, CartSnapshot, LoyaltyAccount};
///
/// let eligible = check_eligibility(Some(&LoyaltyAccount::with_points(10)), &CartSnapshot::default(), &[]);
/// assert!(eligible.is_empty());
/// ```
pub fn check_eligibility<'a>(
    account: Option<&LoyaltyAccount>,
    cart: &CartSnapshot,
    promotions: &'a [Promotion],
) -> Vec<&'a Promotion> {
    promotions
        .iter()
        .filter(|promotion| is_eligible(account, cart, promotion))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promotions::tests::promotion;
    use crate::promotions::PromotionType;

    fn line(product_id: &str, cents: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            quantity: 1,
            total_price: Money::from_cents(cents),
        }
    }

    fn priced(cost: i64) -> Promotion {
        let mut promo = promotion(PromotionType::PointsDiscount);
        promo.points_cost = cost;
        promo
    }

    #[test]
    fn test_points_gate() {
        let promotions = vec![priced(500)];
        let cart = CartSnapshot::default();

        let poor = LoyaltyAccount::with_points(499);
        assert!(check_eligibility(Some(&poor), &cart, &promotions).is_empty());

        let rich = LoyaltyAccount::with_points(500);
        assert_eq!(check_eligibility(Some(&rich), &cart, &promotions).len(), 1);
    }

    #[test]
    fn test_absent_customer_gets_nothing_even_when_free() {
        let promotions = vec![priced(0), priced(100)];
        assert!(check_eligibility(None, &CartSnapshot::default(), &promotions).is_empty());
    }

    #[test]
    fn test_free_promotion_with_zero_balance() {
        let promotions = vec![priced(0)];
        let account = LoyaltyAccount::with_points(0);
        assert_eq!(
            check_eligibility(Some(&account), &CartSnapshot::default(), &promotions).len(),
            1
        );
    }

    #[test]
    fn test_min_order_value_is_in_major_units() {
        let mut promo = priced(0);
        promo.conditions = vec![PromotionCondition::MinOrderValue(50.0)];
        let promotions = vec![promo];
        let account = LoyaltyAccount::with_points(0);

        let short = CartSnapshot::new(vec![line("p1", 2500), line("p2", 2499)]);
        assert!(check_eligibility(Some(&account), &short, &promotions).is_empty());

        let exact = CartSnapshot::new(vec![line("p1", 2500), line("p2", 2500)]);
        assert_eq!(check_eligibility(Some(&account), &exact, &promotions).len(), 1);
    }

    #[test]
    fn test_huge_cart_total_saturates() {
        let mut promo = priced(0);
        promo.conditions = vec![PromotionCondition::MinOrderValue(50.0)];
        let promotions = vec![promo];
        let account = LoyaltyAccount::with_points(0);

        let cart = CartSnapshot::new(vec![line("p1", i64::MAX), line("p2", 1)]);
        assert_eq!(cart.total_price().cents(), i64::MAX);
        assert_eq!(check_eligibility(Some(&account), &cart, &promotions).len(), 1);
    }

    #[test]
    fn test_min_order_count_counts_lines() {
        let condition = PromotionCondition::MinOrderCount(2.0);
        let mut one_line = CartSnapshot::new(vec![line("p1", 100)]);
        one_line.items[0].quantity = 50;
        assert!(!condition_satisfied(&condition, &one_line));

        let two_lines = CartSnapshot::new(vec![line("p1", 100), line("p2", 100)]);
        assert!(condition_satisfied(&condition, &two_lines));
    }

    #[test]
    fn test_specific_products_is_any_match() {
        let condition =
            PromotionCondition::SpecificProducts(vec!["p1".to_string(), "p2".to_string()]);

        assert!(condition_satisfied(
            &condition,
            &CartSnapshot::new(vec![line("p2", 100), line("p9", 100)])
        ));
        assert!(!condition_satisfied(
            &condition,
            &CartSnapshot::new(vec![line("p3", 100)])
        ));
    }

    #[test]
    fn test_order_streak_never_holds() {
        let condition = PromotionCondition::OrderStreak(1.0);
        let cart = CartSnapshot::new(vec![line("p1", 100_000)]);
        assert!(!condition_satisfied(&condition, &cart));
    }

    #[test]
    fn test_conditions_are_a_conjunction() {
        let mut promo = priced(0);
        promo.conditions = vec![
            PromotionCondition::MinOrderValue(1.0),
            PromotionCondition::SpecificProducts(vec!["p7".to_string()]),
        ];
        let account = LoyaltyAccount::with_points(0);
        let cart = CartSnapshot::new(vec![line("p1", 500)]);
        assert!(!is_eligible(Some(&account), &cart, &promo));

        let cart = CartSnapshot::new(vec![line("p7", 500)]);
        assert!(is_eligible(Some(&account), &cart, &promo));
    }

    #[test]
    fn test_result_keeps_input_order() {
        let promotions = vec![priced(30), priced(900), priced(10), priced(20)];
        let account = LoyaltyAccount::with_points(100);

        let eligible = check_eligibility(Some(&account), &CartSnapshot::default(), &promotions);
        let costs: Vec<i64> = eligible.iter().map(|p| p.points_cost).collect();
        assert_eq!(costs, vec![30, 10, 20]);
    }

    #[test]
    fn test_cart_snapshot_deserializes_from_camel_case() {
        let cart: CartSnapshot = serde_json::from_str(
            r#"{"items":[{"productId":"p1","quantity":2,"totalPrice":1250}]}"#,
        )
        .unwrap();
        assert_eq!(cart.total_price().cents(), 1250);
        assert_eq!(cart.item_count(), 1);
    }
}
