//! # Promotions
//!
//! Loyalty promotion model: types, statuses, conditions, rewards and the
//! promotion record with its lifecycle.
//!
//! ## Promotion Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Promotion Status Machine                           │
//! │                                                                         │
//! │   create                                                                │
//! │     │                                                                   │
//! │     ▼          activate()            end()                              │
//! │  ┌───────┐ ─────────────────► ┌────────┐ ──────────► ┌───────┐          │
//! │  │ Draft │                    │ Active │             │ Ended │          │
//! │  └───────┘                    └────────┘             └───────┘          │
//! │     │                                                                   │
//! │     └──► delete (hard delete, draft only)                               │
//! │                                                                         │
//! │  Paused is a representable status with no transition in or out.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submodules
//! - [`rules`] - Static type → condition/reward compatibility tables
//! - [`eligibility`] - Which active promotions a customer can redeem now
//! - [`schema`] - Cross-field validation of admin submissions
//! - [`redemption`] - Spending points on an eligible promotion

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

pub mod eligibility;
pub mod redemption;
pub mod rules;
pub mod schema;

// =============================================================================
// Tag Enums
// =============================================================================

/// Declares a snake_case string-tagged enum with `as_str`, `ALL`, `Display`
/// and `FromStr`.
macro_rules! string_tagged {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(rename_all = "snake_case")]
        #[ts(export)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire tag of this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }

            /// Wire tags of every variant.
            pub fn tags() -> Vec<String> {
                Self::ALL.iter().map(|v| v.as_str().to_string()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| CoreError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

string_tagged! {
    /// The eight kinds of loyalty promotion.
    PromotionType, "promotion type" {
        /// Spend points for a percentage off the order.
        PointsDiscount => "points_discount",
        /// Spend points for a free product.
        PointsProduct => "points_product",
        /// Earn bonus points by completing an order challenge.
        PointsChallenge => "points_challenge",
        /// Time-boxed discount or freebie.
        LimitedTimeOffer => "limited_time_offer",
        /// Unlock a higher loyalty tier.
        TierUnlock => "tier_unlock",
        /// Reward consecutive ordering.
        Streak => "streak",
        /// Seasonal campaign.
        Seasonal => "seasonal",
        /// Reward for referred orders.
        Referral => "referral",
    }
}

string_tagged! {
    /// Promotion status.
    #[derive(Default)]
    PromotionStatus, "promotion status" {
        #[default]
        Draft => "draft",
        Active => "active",
        Paused => "paused",
        Ended => "ended",
    }
}

string_tagged! {
    /// Discriminant of [`PromotionCondition`].
    ConditionKind, "condition type" {
        MinOrderValue => "min_order_value",
        MinOrderCount => "min_order_count",
        SpecificProducts => "specific_products",
        OrderStreak => "order_streak",
    }
}

string_tagged! {
    /// Discriminant of [`PromotionReward`].
    RewardKind, "reward type" {
        DiscountPercentage => "discount_percentage",
        BonusPoints => "bonus_points",
        FreeProduct => "free_product",
        TierUpgrade => "tier_upgrade",
    }
}

string_tagged! {
    /// Loyalty tiers a `tier_upgrade` reward can grant.
    TierLevel, "tier" {
        Silver => "silver",
        Gold => "gold",
        Platinum => "platinum",
    }
}

// =============================================================================
// Conditions & Rewards
// =============================================================================

/// A predicate the cart must satisfy for the promotion to be offered.
///
/// Wire format: `{ "type": "min_order_value", "value": 50 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum PromotionCondition {
    /// Cart total of at least this many whole currency units.
    MinOrderValue(f64),
    /// At least this many cart line items.
    MinOrderCount(f64),
    /// At least one of these product ids is in the cart.
    SpecificProducts(Vec<String>),
    /// This many consecutive orders. Not evaluable from a cart.
    OrderStreak(f64),
}

impl PromotionCondition {
    pub fn kind(&self) -> ConditionKind {
        match self {
            PromotionCondition::MinOrderValue(_) => ConditionKind::MinOrderValue,
            PromotionCondition::MinOrderCount(_) => ConditionKind::MinOrderCount,
            PromotionCondition::SpecificProducts(_) => ConditionKind::SpecificProducts,
            PromotionCondition::OrderStreak(_) => ConditionKind::OrderStreak,
        }
    }
}

/// The benefit granted on redemption.
///
/// Wire format: `{ "type": "discount_percentage", "value": 15 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum PromotionReward {
    /// Percentage off, in (0, 100].
    DiscountPercentage(f64),
    /// Loyalty points credited.
    BonusPoints(f64),
    /// Product id given for free.
    FreeProduct(String),
    /// Tier granted.
    TierUpgrade(TierLevel),
}

impl PromotionReward {
    pub fn kind(&self) -> RewardKind {
        match self {
            PromotionReward::DiscountPercentage(_) => RewardKind::DiscountPercentage,
            PromotionReward::BonusPoints(_) => RewardKind::BonusPoints,
            PromotionReward::FreeProduct(_) => RewardKind::FreeProduct,
            PromotionReward::TierUpgrade(_) => RewardKind::TierUpgrade,
        }
    }
}

// =============================================================================
// Promotion
// =============================================================================

/// A persisted loyalty promotion.
///
/// Identifiers serialize as strings and dates as ISO-8601, which is what
/// the storefront and admin clients read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Promotion {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub promotion_type: PromotionType,
    pub status: PromotionStatus,
    /// Loyalty points spent on redemption. Zero means free.
    #[ts(type = "number")]
    pub points_cost: i64,
    #[serde(default)]
    pub conditions: Vec<PromotionCondition>,
    pub rewards: Vec<PromotionReward>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub max_redemptions: Option<u32>,
    #[serde(default)]
    pub current_redemptions: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Promotion {
    /// Creates a draft from a validated submission.
    pub fn draft(id: Uuid, valid: schema::ValidPromotion, now: DateTime<Utc>) -> Self {
        Promotion {
            id,
            title: valid.title,
            description: valid.description,
            promotion_type: valid.promotion_type,
            status: PromotionStatus::Draft,
            points_cost: valid.points_cost,
            conditions: valid.conditions,
            rewards: valid.rewards,
            start_date: valid.start_date,
            end_date: valid.end_date,
            max_redemptions: valid.max_redemptions,
            current_redemptions: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the editable fields with a validated submission.
    ///
    /// Status, redemption count and creation time are kept.
    pub fn apply_edit(&mut self, valid: schema::ValidPromotion, now: DateTime<Utc>) {
        self.title = valid.title;
        self.description = valid.description;
        self.promotion_type = valid.promotion_type;
        self.points_cost = valid.points_cost;
        self.conditions = valid.conditions;
        self.rewards = valid.rewards;
        self.start_date = valid.start_date;
        self.end_date = valid.end_date;
        self.max_redemptions = valid.max_redemptions;
        self.updated_at = now;
    }

    /// Draft → Active.
    pub fn activate(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        self.transition(PromotionStatus::Draft, PromotionStatus::Active, "activate", now)
    }

    /// Active → Ended.
    pub fn end(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        self.transition(PromotionStatus::Active, PromotionStatus::Ended, "end", now)
    }

    /// Only drafts may be hard-deleted.
    pub fn ensure_deletable(&self) -> CoreResult<()> {
        if self.status != PromotionStatus::Draft {
            return Err(self.status_error("delete"));
        }
        Ok(())
    }

    fn transition(
        &mut self,
        from: PromotionStatus,
        to: PromotionStatus,
        action: &'static str,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        if self.status != from {
            return Err(self.status_error(action));
        }
        self.status = to;
        self.updated_at = now;
        Ok(())
    }

    fn status_error(&self, action: &'static str) -> CoreError {
        CoreError::InvalidPromotionStatus {
            promotion_id: self.id,
            current: self.status,
            action,
        }
    }

    /// Returns true while more redemptions are allowed.
    pub fn has_capacity(&self) -> bool {
        self.max_redemptions
            .map_or(true, |max| self.current_redemptions < max)
    }

    /// Returns true when the promotion can be offered at `now`: active,
    /// inside its date window, and under its redemption cap.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == PromotionStatus::Active
            && self.start_date.map_or(true, |start| start <= now)
            && self.end_date.map_or(true, |end| now <= end)
            && self.has_capacity()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Duration;

    use super::*;

    pub(crate) fn promotion(promotion_type: PromotionType) -> Promotion {
        let now = Utc::now();
        Promotion {
            id: Uuid::new_v4(),
            title: "Spring sale".to_string(),
            description: None,
            promotion_type,
            status: PromotionStatus::Active,
            points_cost: 0,
            conditions: Vec::new(),
            rewards: vec![PromotionReward::DiscountPercentage(10.0)],
            start_date: None,
            end_date: None,
            max_redemptions: None,
            current_redemptions: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_tag_round_trip_through_from_str() {
        for promotion_type in PromotionType::ALL {
            let parsed: PromotionType = promotion_type.as_str().parse().unwrap();
            assert_eq!(parsed, *promotion_type);
        }
        assert_eq!(PromotionType::ALL.len(), 8);
        assert!("bogus".parse::<RewardKind>().is_err());
    }

    #[test]
    fn test_unknown_tag_error_message() {
        let err = "bronze".parse::<TierLevel>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown tier: 'bronze'");
    }

    #[test]
    fn test_status_defaults_to_draft() {
        assert_eq!(PromotionStatus::default(), PromotionStatus::Draft);
        assert_eq!(PromotionStatus::default().as_str(), "draft");
    }

    #[test]
    fn test_condition_wire_format() {
        let condition: PromotionCondition =
            serde_json::from_str(r#"{"type":"specific_products","value":["p1","p2"]}"#).unwrap();
        assert_eq!(
            condition,
            PromotionCondition::SpecificProducts(vec!["p1".to_string(), "p2".to_string()])
        );
        assert_eq!(condition.kind(), ConditionKind::SpecificProducts);

        let json = serde_json::to_value(PromotionReward::TierUpgrade(TierLevel::Gold)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "tier_upgrade", "value": "gold" }));
    }

    #[test]
    fn test_promotion_serializes_string_id_and_iso_dates() {
        let mut promo = promotion(PromotionType::Seasonal);
        promo.start_date = Some("2026-11-01T00:00:00Z".parse().unwrap());

        let json = serde_json::to_value(&promo).unwrap();
        assert_eq!(json["id"], serde_json::json!(promo.id.to_string()));
        assert_eq!(json["type"], "seasonal");
        assert_eq!(json["status"], "active");
        assert_eq!(json["startDate"], "2026-11-01T00:00:00Z");
        assert!(json.get("endDate").is_none());
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let now = Utc::now();
        let mut promo = promotion(PromotionType::Streak);
        promo.status = PromotionStatus::Draft;

        promo.ensure_deletable().unwrap();
        promo.activate(now).unwrap();
        assert_eq!(promo.status, PromotionStatus::Active);
        promo.end(now).unwrap();
        assert_eq!(promo.status, PromotionStatus::Ended);
    }

    #[test]
    fn test_lifecycle_rejects_invalid_transitions() {
        let now = Utc::now();
        let mut promo = promotion(PromotionType::Streak);

        promo.status = PromotionStatus::Draft;
        assert!(promo.end(now).is_err());

        promo.status = PromotionStatus::Active;
        assert!(promo.activate(now).is_err());
        assert!(promo.ensure_deletable().is_err());

        promo.status = PromotionStatus::Ended;
        assert!(promo.activate(now).is_err());
        assert!(promo.end(now).is_err());
        assert!(promo.ensure_deletable().is_err());

        promo.status = PromotionStatus::Paused;
        assert!(promo.activate(now).is_err());
        assert!(promo.end(now).is_err());
        assert!(matches!(
            promo.ensure_deletable(),
            Err(CoreError::InvalidPromotionStatus { current: PromotionStatus::Paused, .. })
        ));
    }

    #[test]
    fn test_is_live_window_and_capacity() {
        let now = Utc::now();
        let mut promo = promotion(PromotionType::LimitedTimeOffer);
        assert!(promo.is_live(now));

        promo.start_date = Some(now + Duration::hours(1));
        assert!(!promo.is_live(now));

        promo.start_date = Some(now - Duration::days(1));
        promo.end_date = Some(now - Duration::hours(1));
        assert!(!promo.is_live(now));

        promo.end_date = Some(now + Duration::days(1));
        assert!(promo.is_live(now));

        promo.max_redemptions = Some(3);
        promo.current_redemptions = 3;
        assert!(!promo.is_live(now));

        promo.current_redemptions = 2;
        promo.status = PromotionStatus::Paused;
        assert!(!promo.is_live(now));
    }
}
