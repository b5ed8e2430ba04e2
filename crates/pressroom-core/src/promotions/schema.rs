//! # Promotion Schema Validation
//!
//! Turns a loosely typed admin submission into a [`ValidPromotion`], or
//! reports every violated rule at once.
//!
//! ## Rule Set
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PromotionCandidate (raw JSON body)                                     │
//! │       │                                                                 │
//! │       ├── title / description / pointsCost / maxRedemptions / type     │
//! │       ├── conditions[]: known tag? allowed for type? value shape?      │
//! │       ├── rewards[]:    non-empty? known tag? allowed? value shape?    │
//! │       ├── startDate < endDate                       → "endDate"        │
//! │       └── startDate > now (create, or opted in)     → "startDate"      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  all rules run, no short-circuit                                        │
//! │       │                                                                 │
//! │       ├── no violations → Ok(ValidPromotion)                           │
//! │       └── otherwise     → Err(ValidationErrors { field → [msg] })      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use super::rules::{is_condition_allowed, is_reward_allowed};
use super::{ConditionKind, PromotionCondition, PromotionReward, PromotionType, RewardKind, TierLevel};
use crate::error::{ValidationError, ValidationErrors};
use crate::validation::{
    non_empty_string, parse_date, percentage, positive_number, product_id_list,
    validate_date_order, validate_description, validate_future_start, validate_max_redemptions,
    validate_points_cost, validate_title, ValidationResult,
};

const CONDITIONS: &str = "conditions";
const REWARDS: &str = "rewards";

// =============================================================================
// Input
// =============================================================================

/// A `{ type, value }` pair as submitted, before its tag is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaggedValue {
    #[serde(rename = "type")]
    pub tag: String,
    #[serde(default)]
    pub value: Value,
}

impl TaggedValue {
    pub fn new(tag: &str, value: Value) -> Self {
        TaggedValue {
            tag: tag.to_string(),
            value,
        }
    }
}

/// The promotion body submitted by the admin form.
///
/// Every field is optional or defaulted so that missing input shows up as a
/// validation message rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct PromotionCandidate {
    pub title: String,
    #[ts(optional)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub promotion_type: String,
    pub points_cost: f64,
    pub conditions: Vec<TaggedValue>,
    pub rewards: Vec<TaggedValue>,
    #[ts(optional)]
    pub start_date: Option<String>,
    #[ts(optional)]
    pub end_date: Option<String>,
    #[ts(optional)]
    pub max_redemptions: Option<f64>,
}

/// When and how a submission is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub now: DateTime<Utc>,
    /// Reject a `startDate` that is not in the future.
    pub require_future_start: bool,
}

impl ValidationContext {
    /// Creating a promotion: the start date must be in the future.
    pub fn create(now: DateTime<Utc>) -> Self {
        ValidationContext {
            now,
            require_future_start: true,
        }
    }

    /// Editing a promotion: a past start date is accepted.
    pub fn update(now: DateTime<Utc>) -> Self {
        ValidationContext {
            now,
            require_future_start: false,
        }
    }

    pub fn with_future_start(mut self, required: bool) -> Self {
        self.require_future_start = required;
        self
    }
}

// =============================================================================
// Output
// =============================================================================

/// A submission that passed every rule, with typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPromotion {
    pub title: String,
    pub description: Option<String>,
    pub promotion_type: PromotionType,
    pub points_cost: i64,
    pub conditions: Vec<PromotionCondition>,
    pub rewards: Vec<PromotionReward>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_redemptions: Option<u32>,
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a submission against every field and cross-field rule.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use pressroom_core::promotions::schema::{validate_promotion, PromotionCandidate, ValidationContext};
///
/// let candidate: PromotionCandidate = serde_json::from_value(serde_json::json!({
///     "title": "15% off big orders",
///     "type": "points_discount",
///     "pointsCost": 500,
///     "conditions": [{ "type": "min_order_value", "value": 50 }],
///     "rewards": [{ "type": "bonus_points", "value": 100 }]
/// })).unwrap();
///
/// let errors = validate_promotion(&candidate, &ValidationContext::create(Utc::now())).unwrap_err();
/// assert_eq!(errors.fields(), vec!["rewards"]);
/// ```
pub fn validate_promotion(
    candidate: &PromotionCandidate,
    context: &ValidationContext,
) -> Result<ValidPromotion, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_title(&candidate.title));
    errors.check(validate_description(candidate.description.as_deref()));
    let points_cost = collect(&mut errors, validate_points_cost(candidate.points_cost));
    let max_redemptions = collect(
        &mut errors,
        validate_max_redemptions(candidate.max_redemptions),
    );

    let promotion_type = collect(&mut errors, parse_promotion_type(&candidate.promotion_type));

    let conditions: Vec<PromotionCondition> = candidate
        .conditions
        .iter()
        .filter_map(|tagged| check_condition(tagged, promotion_type, &mut errors))
        .collect();

    if candidate.rewards.is_empty() {
        errors.push(ValidationError::Required {
            field: REWARDS.to_string(),
        });
    }
    let rewards: Vec<PromotionReward> = candidate
        .rewards
        .iter()
        .filter_map(|tagged| check_reward(tagged, promotion_type, &mut errors))
        .collect();

    let start_date = collect(&mut errors, optional_date("startDate", &candidate.start_date));
    let end_date = collect(&mut errors, optional_date("endDate", &candidate.end_date));
    if let (Some(start), Some(end)) = (start_date, end_date) {
        errors.check(validate_date_order(start, end));
    }
    if let (Some(start), true) = (start_date, context.require_future_start) {
        errors.check(validate_future_start(start, context.now));
    }

    match (promotion_type, points_cost, max_redemptions, start_date, end_date) {
        (Some(promotion_type), Some(points_cost), Some(max_redemptions), Some(start_date), Some(end_date))
            if errors.is_empty() =>
        {
            Ok(ValidPromotion {
                title: candidate.title.trim().to_string(),
                description: candidate.description.clone(),
                promotion_type,
                points_cost,
                conditions,
                rewards,
                start_date,
                end_date,
                max_redemptions,
            })
        }
        _ => Err(errors),
    }
}

/// Records a failed validator and yields its value on success.
fn collect<T>(errors: &mut ValidationErrors, result: ValidationResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}

fn parse_promotion_type(raw: &str) -> ValidationResult<PromotionType> {
    raw.parse().map_err(|_| {
        if raw.trim().is_empty() {
            ValidationError::Required {
                field: "type".to_string(),
            }
        } else {
            ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: PromotionType::tags(),
            }
        }
    })
}

fn optional_date(
    field: &str,
    raw: &Option<String>,
) -> ValidationResult<Option<DateTime<Utc>>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(field, text).map(Some),
    }
}

/// Checks one condition's tag, compatibility and value shape.
fn check_condition(
    tagged: &TaggedValue,
    promotion_type: Option<PromotionType>,
    errors: &mut ValidationErrors,
) -> Option<PromotionCondition> {
    let kind: ConditionKind = match tagged.tag.parse() {
        Ok(kind) => kind,
        Err(_) => {
            errors.push(ValidationError::NotAllowed {
                field: CONDITIONS.to_string(),
                allowed: ConditionKind::tags(),
            });
            return None;
        }
    };

    if let Some(promotion_type) = promotion_type {
        if !is_condition_allowed(promotion_type, kind) {
            errors.push(ValidationError::Incompatible {
                field: CONDITIONS.to_string(),
                kind: "Condition",
                tag: kind.to_string(),
                promotion_type: promotion_type.to_string(),
            });
        }
    }

    let value = &tagged.value;
    let condition = match kind {
        ConditionKind::MinOrderValue => {
            positive_number(CONDITIONS, value).map(PromotionCondition::MinOrderValue)
        }
        ConditionKind::MinOrderCount => {
            positive_number(CONDITIONS, value).map(PromotionCondition::MinOrderCount)
        }
        ConditionKind::SpecificProducts => {
            product_id_list(CONDITIONS, value).map(PromotionCondition::SpecificProducts)
        }
        ConditionKind::OrderStreak => {
            positive_number(CONDITIONS, value).map(PromotionCondition::OrderStreak)
        }
    };
    collect(errors, condition)
}

/// Checks one reward's tag, compatibility and value shape.
fn check_reward(
    tagged: &TaggedValue,
    promotion_type: Option<PromotionType>,
    errors: &mut ValidationErrors,
) -> Option<PromotionReward> {
    let kind: RewardKind = match tagged.tag.parse() {
        Ok(kind) => kind,
        Err(_) => {
            errors.push(ValidationError::NotAllowed {
                field: REWARDS.to_string(),
                allowed: RewardKind::tags(),
            });
            return None;
        }
    };

    if let Some(promotion_type) = promotion_type {
        if !is_reward_allowed(promotion_type, kind) {
            errors.push(ValidationError::Incompatible {
                field: REWARDS.to_string(),
                kind: "Reward",
                tag: kind.to_string(),
                promotion_type: promotion_type.to_string(),
            });
        }
    }

    let value = &tagged.value;
    let reward = match kind {
        RewardKind::DiscountPercentage => {
            percentage(REWARDS, value).map(PromotionReward::DiscountPercentage)
        }
        RewardKind::BonusPoints => positive_number(REWARDS, value).map(PromotionReward::BonusPoints),
        RewardKind::FreeProduct => non_empty_string(REWARDS, value).map(PromotionReward::FreeProduct),
        RewardKind::TierUpgrade => tier_level(value).map(PromotionReward::TierUpgrade),
    };
    collect(errors, reward)
}

fn tier_level(value: &Value) -> ValidationResult<TierLevel> {
    value
        .as_str()
        .and_then(|tag| tag.parse().ok())
        .ok_or_else(|| ValidationError::NotAllowed {
            field: REWARDS.to_string(),
            allowed: TierLevel::tags(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
