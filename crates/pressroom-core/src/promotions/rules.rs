//! Static promotion-type compatibility tables.
//!
//! Each promotion type admits a fixed subset of condition types and reward
//! types. The tables are constant data; nothing builds or mutates them at
//! runtime.

use super::{ConditionKind, PromotionType, RewardKind};

/// Condition types a promotion of `promotion_type` may declare.
pub const fn allowed_conditions(promotion_type: PromotionType) -> &'static [ConditionKind] {
    use ConditionKind::*;

    match promotion_type {
        PromotionType::PointsDiscount => &[MinOrderValue],
        PromotionType::PointsProduct => &[SpecificProducts],
        PromotionType::PointsChallenge => &[MinOrderCount, OrderStreak],
        PromotionType::LimitedTimeOffer => &[MinOrderValue, SpecificProducts],
        PromotionType::TierUnlock => &[MinOrderValue, MinOrderCount],
        PromotionType::Streak => &[OrderStreak],
        PromotionType::Seasonal => &[MinOrderValue, SpecificProducts],
        PromotionType::Referral => &[MinOrderCount],
    }
}

/// Reward types a promotion of `promotion_type` may grant.
pub const fn allowed_rewards(promotion_type: PromotionType) -> &'static [RewardKind] {
    use RewardKind::*;

    match promotion_type {
        PromotionType::PointsDiscount => &[DiscountPercentage],
        PromotionType::PointsProduct => &[FreeProduct],
        PromotionType::PointsChallenge => &[BonusPoints],
        PromotionType::LimitedTimeOffer => &[DiscountPercentage, FreeProduct],
        PromotionType::TierUnlock => &[TierUpgrade],
        PromotionType::Streak => &[BonusPoints, DiscountPercentage],
        PromotionType::Seasonal => &[DiscountPercentage, FreeProduct],
        PromotionType::Referral => &[BonusPoints],
    }
}

pub fn is_condition_allowed(promotion_type: PromotionType, kind: ConditionKind) -> bool {
    allowed_conditions(promotion_type).contains(&kind)
}

pub fn is_reward_allowed(promotion_type: PromotionType, kind: RewardKind) -> bool {
    allowed_rewards(promotion_type).contains(&kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_allows_at_least_one_of_each() {
        for promotion_type in PromotionType::ALL {
            assert!(!allowed_conditions(*promotion_type).is_empty());
            assert!(!allowed_rewards(*promotion_type).is_empty());
        }
    }

    #[test]
    fn test_points_discount_pairs() {
        let t = PromotionType::PointsDiscount;
        assert!(is_condition_allowed(t, ConditionKind::MinOrderValue));
        assert!(!is_condition_allowed(t, ConditionKind::SpecificProducts));
        assert!(is_reward_allowed(t, RewardKind::DiscountPercentage));
        assert!(!is_reward_allowed(t, RewardKind::BonusPoints));
    }

    #[test]
    fn test_tier_upgrade_only_for_tier_unlock() {
        let granting: Vec<_> = PromotionType::ALL
            .iter()
            .filter(|t| is_reward_allowed(**t, RewardKind::TierUpgrade))
            .collect();
        assert_eq!(granting, vec![&PromotionType::TierUnlock]);
    }

    #[test]
    fn test_order_streak_types() {
        let streaky: Vec<_> = PromotionType::ALL
            .iter()
            .copied()
            .filter(|t| is_condition_allowed(*t, ConditionKind::OrderStreak))
            .collect();
        assert_eq!(
            streaky,
            vec![PromotionType::PointsChallenge, PromotionType::Streak]
        );
    }
}
