//! # Promotion Handlers
//!
//! Storefront eligibility, admin management and redemption.
//!
//! ## Request Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront                                                             │
//! │  cart changes ──► eligible_promotions ──► one toast per promotion      │
//! │  "Redeem" ──────► redeem_promotion ─────► points deducted, rewards     │
//! │                                                                         │
//! │  Admin                                                                  │
//! │  form submit ───► create_promotion / update_promotion                  │
//! │                        │                                                │
//! │                        ├── invalid → 400 { field: [messages] }         │
//! │                        └── valid   → stored (created as draft)         │
//! │  buttons ───────► activate_promotion / end_promotion / delete_promotion│
//! │                        └── wrong status → 409                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use pressroom_core::promotions::redemption::{redeem, Redemption};
use pressroom_core::validation::validate_cart_size;
use pressroom_core::{
    check_eligibility, validate_promotion, CartSnapshot, LoyaltyAccount, Promotion,
    PromotionCandidate, ValidationContext,
};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::Storefront;

// =============================================================================
// Storefront
// =============================================================================

/// Lists the live promotions the customer can redeem against `cart`, in
/// store order.
///
/// An anonymous visitor always gets an empty list.
pub fn eligible_promotions(
    storefront: &Storefront,
    account: Option<&LoyaltyAccount>,
    cart: &CartSnapshot,
    now: DateTime<Utc>,
) -> ApiResult<Vec<Promotion>> {
    validate_cart_size(cart.item_count(), storefront.config.max_cart_lines)?;

    let live = storefront.promotions.live_snapshot(now);
    let eligible: Vec<Promotion> = check_eligibility(account, cart, &live)
        .into_iter()
        .cloned()
        .collect();

    debug!(
        signed_in = account.is_some(),
        cart_lines = cart.item_count(),
        cart_total_cents = cart.total_price().cents(),
        live = live.len(),
        eligible = eligible.len(),
        "Evaluated promotion eligibility"
    );

    Ok(eligible)
}

/// Redeems a promotion for the signed-in customer.
///
/// The caller persists the updated `account` on success.
pub fn redeem_promotion(
    storefront: &Storefront,
    account: Option<&mut LoyaltyAccount>,
    cart: &CartSnapshot,
    id: Uuid,
    now: DateTime<Utc>,
) -> ApiResult<Redemption> {
    validate_cart_size(cart.item_count(), storefront.config.max_cart_lines)?;

    let redemption = storefront
        .promotions
        .modify(id, |promotion| -> ApiResult<Redemption> {
            Ok(redeem(account, cart, promotion, now)?)
        })
        .map_err(|err| {
            debug!(promotion_id = %id, error = %err, "Redemption refused");
            err
        })?;

    info!(
        promotion_id = %id,
        points_spent = redemption.points_spent,
        "Promotion redeemed"
    );
    Ok(redemption)
}

// =============================================================================
// Admin
// =============================================================================

pub fn list_promotions(storefront: &Storefront) -> Vec<Promotion> {
    storefront.promotions.snapshot()
}

pub fn get_promotion(storefront: &Storefront, id: Uuid) -> ApiResult<Promotion> {
    Ok(storefront.promotions.get(id)?)
}

/// Validates a new promotion and stores it as a draft.
pub fn create_promotion(
    storefront: &Storefront,
    body: Value,
    now: DateTime<Utc>,
) -> ApiResult<Promotion> {
    let candidate: PromotionCandidate = serde_json::from_value(body)?;
    let valid = validate_promotion(&candidate, &ValidationContext::create(now)).map_err(|errors| {
        warn!(fields = ?errors.fields(), "Rejected promotion submission");
        ApiError::validation(errors)
    })?;

    let promotion = Promotion::draft(Uuid::new_v4(), valid, now);
    storefront.promotions.insert(promotion.clone())?;

    info!(
        promotion_id = %promotion.id,
        promotion_type = %promotion.promotion_type,
        "Promotion created"
    );
    Ok(promotion)
}

/// Validates an edit and applies it to the stored promotion.
///
/// A past start date is accepted unless the storefront is configured to
/// enforce the future start rule on edits too.
pub fn update_promotion(
    storefront: &Storefront,
    id: Uuid,
    body: Value,
    now: DateTime<Utc>,
) -> ApiResult<Promotion> {
    let candidate: PromotionCandidate = serde_json::from_value(body)?;
    let context = ValidationContext::update(now)
        .with_future_start(storefront.config.enforce_future_start_on_update);
    let valid = validate_promotion(&candidate, &context).map_err(|errors| {
        warn!(promotion_id = %id, fields = ?errors.fields(), "Rejected promotion edit");
        ApiError::validation(errors)
    })?;

    let promotion = storefront
        .promotions
        .modify(id, |promotion| -> ApiResult<Promotion> {
            promotion.apply_edit(valid, now);
            Ok(promotion.clone())
        })?;

    info!(promotion_id = %id, "Promotion updated");
    Ok(promotion)
}

/// Draft → Active.
pub fn activate_promotion(
    storefront: &Storefront,
    id: Uuid,
    now: DateTime<Utc>,
) -> ApiResult<Promotion> {
    let promotion = storefront
        .promotions
        .modify(id, |promotion| -> ApiResult<Promotion> {
            promotion.activate(now)?;
            Ok(promotion.clone())
        })?;

    info!(promotion_id = %id, "Promotion activated");
    Ok(promotion)
}

/// Active → Ended.
pub fn end_promotion(
    storefront: &Storefront,
    id: Uuid,
    now: DateTime<Utc>,
) -> ApiResult<Promotion> {
    let promotion = storefront
        .promotions
        .modify(id, |promotion| -> ApiResult<Promotion> {
            promotion.end(now)?;
            Ok(promotion.clone())
        })?;

    info!(promotion_id = %id, "Promotion ended");
    Ok(promotion)
}

/// Hard-deletes a draft.
pub fn delete_promotion(storefront: &Storefront, id: Uuid) -> ApiResult<Promotion> {
    let removed = storefront
        .promotions
        .remove_if(id, |promotion| -> ApiResult<()> {
            Ok(promotion.ensure_deletable()?)
        })?;

    info!(promotion_id = %id, "Promotion deleted");
    Ok(removed)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pressroom_core::{CartLine, Money, PromotionCondition, PromotionStatus};
    use serde_json::json;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::error::ErrorCode;
    use crate::store::tests::active_promotion;
    use crate::store::PromotionStore;

    fn storefront_with(promotions: Vec<Promotion>) -> Storefront {
        Storefront::new(
            StorefrontConfig::default(),
            PromotionStore::from_promotions(promotions),
        )
    }

    fn cart(lines: &[(&str, i64)]) -> CartSnapshot {
        CartSnapshot::new(
            lines
                .iter()
                .map(|(product_id, cents)| CartLine {
                    product_id: product_id.to_string(),
                    quantity: 1,
                    total_price: Money::from_cents(*cents),
                })
                .collect(),
        )
    }

    fn discount_body() -> Value {
        json!({
            "title": "10% off orders over $50",
            "type": "points_discount",
            "pointsCost": 500,
            "conditions": [{ "type": "min_order_value", "value": 50 }],
            "rewards": [{ "type": "discount_percentage", "value": 10 }]
        })
    }

    #[test]
    fn test_eligible_promotions_filters_and_serializes() {
        let mut gated = active_promotion(0);
        gated.conditions = vec![PromotionCondition::MinOrderValue(50.0)];
        let expensive = active_promotion(1000);
        let mut paused = active_promotion(0);
        paused.status = PromotionStatus::Paused;
        let storefront = storefront_with(vec![gated.clone(), expensive, paused]);

        let account = LoyaltyAccount::with_points(200);
        let now = Utc::now();

        let small = eligible_promotions(&storefront, Some(&account), &cart(&[("p1", 4999)]), now)
            .unwrap();
        assert!(small.is_empty());

        let big = eligible_promotions(&storefront, Some(&account), &cart(&[("p1", 5000)]), now)
            .unwrap();
        assert_eq!(big, vec![gated.clone()]);

        let body = serde_json::to_value(&big).unwrap();
        assert_eq!(body[0]["id"], json!(gated.id.to_string()));
        assert_eq!(body[0]["type"], "points_discount");
        assert!(body[0]["createdAt"].is_string());
    }

    #[test]
    fn test_anonymous_visitor_sees_nothing() {
        let storefront = storefront_with(vec![active_promotion(0)]);
        let eligible = eligible_promotions(&storefront, None, &cart(&[]), Utc::now()).unwrap();
        assert!(eligible.is_empty());
    }

    #[test]
    fn test_oversized_cart_rejected() {
        let mut storefront = storefront_with(vec![]);
        storefront.config.max_cart_lines = 1;
        let err = eligible_promotions(
            &storefront,
            None,
            &cart(&[("p1", 1), ("p2", 1)]),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(err.body().get("cart.items").is_some());
    }

    #[test]
    fn test_create_stores_draft() {
        let storefront = storefront_with(vec![]);
        let created = create_promotion(&storefront, discount_body(), Utc::now()).unwrap();

        assert_eq!(created.status, PromotionStatus::Draft);
        assert_eq!(created.points_cost, 500);
        assert_eq!(get_promotion(&storefront, created.id).unwrap(), created);
        assert_eq!(list_promotions(&storefront).len(), 1);
    }

    #[test]
    fn test_create_rejects_cross_type_reward_with_field_body() {
        let storefront = storefront_with(vec![]);
        let mut body = discount_body();
        body["rewards"] = json!([{ "type": "bonus_points", "value": 100 }]);

        let err = create_promotion(&storefront, body, Utc::now()).unwrap_err();
        assert_eq!(err.status(), 400);
        assert_eq!(
            err.body(),
            json!({
                "rewards": ["Reward type 'bonus_points' is not valid for promotion type 'points_discount'"]
            })
        );
        assert!(list_promotions(&storefront).is_empty());
    }

    #[test]
    fn test_create_rejects_malformed_body() {
        let storefront = storefront_with(vec![]);
        let err = create_promotion(&storefront, json!({ "conditions": 7 }), Utc::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_past_start_allowed_on_update_only() {
        let now = Utc::now();
        let storefront = storefront_with(vec![]);
        let created = create_promotion(&storefront, discount_body(), now).unwrap();

        let mut body = discount_body();
        body["startDate"] = json!((now - Duration::days(2)).to_rfc3339());

        let err = create_promotion(&storefront, body.clone(), now).unwrap_err();
        assert!(err.body().get("startDate").is_some());

        let updated = update_promotion(&storefront, created.id, body.clone(), now).unwrap();
        assert!(updated.start_date.is_some());

        let mut strict = storefront.clone();
        strict.config.enforce_future_start_on_update = true;
        assert!(update_promotion(&strict, created.id, body, now).is_err());
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let storefront = storefront_with(vec![]);
        let err = update_promotion(&storefront, Uuid::new_v4(), discount_body(), Utc::now())
            .unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn test_lifecycle_through_handlers() {
        let now = Utc::now();
        let storefront = storefront_with(vec![]);
        let id = create_promotion(&storefront, discount_body(), now).unwrap().id;

        assert_eq!(end_promotion(&storefront, id, now).unwrap_err().status(), 409);

        let active = activate_promotion(&storefront, id, now).unwrap();
        assert_eq!(active.status, PromotionStatus::Active);
        assert_eq!(activate_promotion(&storefront, id, now).unwrap_err().status(), 409);
        assert_eq!(delete_promotion(&storefront, id).unwrap_err().status(), 409);

        let ended = end_promotion(&storefront, id, now).unwrap();
        assert_eq!(ended.status, PromotionStatus::Ended);
    }

    #[test]
    fn test_delete_draft() {
        let now = Utc::now();
        let storefront = storefront_with(vec![]);
        let id = create_promotion(&storefront, discount_body(), now).unwrap().id;

        delete_promotion(&storefront, id).unwrap();
        assert_eq!(get_promotion(&storefront, id).unwrap_err().status(), 404);
        assert_eq!(delete_promotion(&storefront, id).unwrap_err().status(), 404);
    }

    #[test]
    fn test_redeem_updates_account_and_counter() {
        let mut promo = active_promotion(300);
        promo.max_redemptions = Some(1);
        let id = promo.id;
        let storefront = storefront_with(vec![promo]);
        let mut account = LoyaltyAccount::with_points(500);
        let now = Utc::now();

        let receipt =
            redeem_promotion(&storefront, Some(&mut account), &cart(&[("p1", 100)]), id, now)
                .unwrap();
        assert_eq!(receipt.remaining_points, 200);
        assert_eq!(account.unspent_loyalty_points, 200);
        assert_eq!(get_promotion(&storefront, id).unwrap().current_redemptions, 1);

        // capped at one
        let err = redeem_promotion(&storefront, Some(&mut account), &cart(&[]), id, now)
            .unwrap_err();
        assert_eq!(err.status(), 409);
        assert!(eligible_promotions(&storefront, Some(&account), &cart(&[]), now)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_redeem_failures_map_to_statuses() {
        let promo = active_promotion(300);
        let id = promo.id;
        let storefront = storefront_with(vec![promo]);
        let now = Utc::now();

        let err = redeem_promotion(&storefront, None, &cart(&[]), id, now).unwrap_err();
        assert_eq!(err.status(), 401);

        let mut poor = LoyaltyAccount::with_points(10);
        let err = redeem_promotion(&storefront, Some(&mut poor), &cart(&[]), id, now).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientPoints);
        assert_eq!(poor.unspent_loyalty_points, 10);

        let err = redeem_promotion(&storefront, Some(&mut poor), &cart(&[]), Uuid::new_v4(), now)
            .unwrap_err();
        assert_eq!(err.status(), 404);
    }
}
