//! Spending loyalty points on a promotion.
//!
//! Redemption re-runs the eligibility rules against the caller's snapshot,
//! then mutates both the account and the promotion. Nothing is changed when
//! any check fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::eligibility::{can_afford, condition_satisfied, CartSnapshot, LoyaltyAccount};
use super::{Promotion, PromotionReward};
use crate::error::{CoreError, CoreResult};

/// Receipt returned to the storefront after a successful redemption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Redemption {
    pub promotion_id: Uuid,
    #[ts(type = "number")]
    pub points_spent: i64,
    #[ts(type = "number")]
    pub remaining_points: i64,
    pub rewards: Vec<PromotionReward>,
    pub redeemed_at: DateTime<Utc>,
}

/// Redeems `promotion` for `account` against `cart`.
///
/// ## Checks (in order)
/// 1. A customer is signed in
/// 2. The redemption cap is not reached
/// 3. The promotion is active and inside its date window
/// 4. The customer can pay the points cost
/// 5. The cart meets every condition
///
/// On success the points cost is deducted and the redemption counter
/// incremented.
pub fn redeem(
    account: Option<&mut LoyaltyAccount>,
    cart: &CartSnapshot,
    promotion: &mut Promotion,
    now: DateTime<Utc>,
) -> CoreResult<Redemption> {
    let account = account.ok_or(CoreError::CustomerRequired)?;

    if !promotion.has_capacity() {
        return Err(CoreError::RedemptionLimitReached {
            promotion_id: promotion.id,
            max: promotion.max_redemptions.unwrap_or_default(),
        });
    }

    if !promotion.is_live(now) {
        return Err(CoreError::PromotionNotLive(promotion.id));
    }

    if !can_afford(Some(&*account), promotion) {
        return Err(CoreError::InsufficientPoints {
            required: promotion.points_cost,
            available: account.unspent_loyalty_points,
        });
    }

    if !promotion
        .conditions
        .iter()
        .all(|condition| condition_satisfied(condition, cart))
    {
        return Err(CoreError::ConditionsNotMet(promotion.id));
    }

    let points_spent = promotion.points_cost.max(0);
    account.unspent_loyalty_points -= points_spent;
    promotion.current_redemptions += 1;
    promotion.updated_at = now;

    Ok(Redemption {
        promotion_id: promotion.id,
        points_spent,
        remaining_points: account.unspent_loyalty_points,
        rewards: promotion.rewards.clone(),
        redeemed_at: now,
    })
}
