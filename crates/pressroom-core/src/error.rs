//! # Error Types
//!
//! Domain-specific error types for pressroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pressroom-core errors (this file)                                     │
//! │  ├── CoreError         - Promotion lifecycle / redemption failures     │
//! │  ├── ValidationError   - One violated field rule                       │
//! │  └── ValidationErrors  - Every violated rule of one submission         │
//! │                                                                         │
//! │  storefront errors (apps/storefront)                                   │
//! │  └── ApiError          - What the HTTP layer sees (status + body)      │
//! │                                                                         │
//! │  Flow: ValidationError → ValidationErrors → CoreError → ApiError       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing engine and the eligibility evaluator never return errors;
//! only promotion validation, lifecycle changes and redemption do.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;
use uuid::Uuid;

use crate::promotions::PromotionStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A lifecycle action was attempted from a status that does not allow it.
    ///
    /// ## When This Occurs
    /// - Activating a promotion that is not a draft
    /// - Ending a promotion that is not active
    /// - Deleting a promotion that already left draft
    #[error("Promotion {promotion_id} is {current}, cannot {action}")]
    InvalidPromotionStatus {
        promotion_id: Uuid,
        current: PromotionStatus,
        action: &'static str,
    },

    /// The promotion is not active or outside its date window.
    #[error("Promotion {0} is not currently running")]
    PromotionNotLive(Uuid),

    /// The promotion reached its redemption cap.
    #[error("Promotion {promotion_id} reached its limit of {max} redemptions")]
    RedemptionLimitReached { promotion_id: Uuid, max: u32 },

    /// The customer cannot pay the promotion's points cost.
    #[error("Insufficient loyalty points: {required} required, {available} available")]
    InsufficientPoints { required: i64, available: i64 },

    /// The cart does not satisfy the promotion's conditions.
    #[error("Cart does not satisfy the conditions of promotion {0}")]
    ConditionsNotMet(Uuid),

    /// A redemption was attempted without a signed-in customer.
    #[error("A customer account is required to redeem promotions")]
    CustomerRequired,

    /// A string tag did not name a known variant.
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// Promotion submission failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single violated field rule.
///
/// Each variant carries the field path it applies to so the admin form can
/// highlight the offending input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value has the wrong shape for its type tag.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A condition or reward type cannot be combined with the promotion type.
    #[error("{kind} type '{tag}' is not valid for promotion type '{promotion_type}'")]
    Incompatible {
        field: String,
        kind: &'static str,
        tag: String,
        promotion_type: String,
    },

    /// End date is not after start date.
    #[error("{field} must be after the start date")]
    DateOrder { field: String },

    /// Start date is not in the future.
    #[error("{field} must be in the future")]
    NotInFuture { field: String },
}

impl ValidationError {
    /// Returns the field path this error applies to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::Incompatible { field, .. }
            | ValidationError::DateOrder { field }
            | ValidationError::NotInFuture { field } => field,
        }
    }
}

// =============================================================================
// Validation Errors (collected)
// =============================================================================

/// Every rule violated by one submission, in the order they were found.
///
/// ## Serialization
/// Serializes as a `{ field: [messages] }` map, which is the body the admin
/// form expects on HTTP 400:
/// ```json
/// {
///   "rewards": ["Reward type 'bonus_points' is not valid for promotion type 'points_discount'"],
///   "endDate": ["endDate must be after the start date"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Records the error of a single-field validator, if any.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.push(error);
        }
    }

    /// Returns true when no rule was violated.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the individual violations.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns the distinct field paths with at least one violation.
    pub fn fields(&self) -> Vec<&str> {
        self.field_map().into_keys().collect()
    }

    /// Returns true if `field` has at least one violation.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == field)
    }

    /// Groups messages by field path.
    pub fn field_map(&self) -> BTreeMap<&str, Vec<String>> {
        let mut map: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            map.entry(error.field()).or_default().push(error.to_string());
        }
        map
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields();
        write!(f, "{} invalid field(s): {}", fields.len(), fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.field_map();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (field, messages) in &fields {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
