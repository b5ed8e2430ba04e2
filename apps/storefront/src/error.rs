//! # API Error Type
//!
//! Unified error type for the storefront handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Pressroom                              │
//! │                                                                         │
//! │  Handler Function                                                       │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ├── Bad JSON body? ──── serde_json::Error ─────────► 400        │
//! │         ├── Rules violated? ─── ValidationErrors ──────────► 400        │
//! │         ├── Unknown id? ─────── StoreError::NotFound ──────► 404        │
//! │         ├── Wrong status? ───── CoreError (lifecycle) ─────► 409        │
//! │         └── Not eligible? ───── CoreError (redemption) ────► 401/422    │
//! │                                                                         │
//! │  The HTTP layer writes `status` and `body()` unchanged.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pressroom_core::{CoreError, ValidationError, ValidationErrors};
use serde::Serialize;
use serde_json::{json, Value};

use crate::store::StoreError;

/// Convenience type alias for handler results.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error returned from storefront handlers.
///
/// ## Response Body
/// Validation failures send the field map the admin form binds to:
/// ```json
/// { "rewards": ["Reward type 'bonus_points' is not valid for promotion type 'points_discount'"] }
/// ```
/// Everything else sends a code and a message:
/// ```json
/// { "code": "CONFLICT", "message": "Promotion ... is active, cannot delete" }
/// ```
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field messages when the request failed validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body could not be parsed (400)
    InvalidRequest,

    /// Input validation failed (400)
    ValidationError,

    /// No customer signed in (401)
    Unauthorized,

    /// Resource not found (404)
    NotFound,

    /// Action not allowed in the resource's current state (409)
    Conflict,

    /// Customer cannot pay the points cost (422)
    InsufficientPoints,

    /// Cart does not meet the promotion's conditions (422)
    NotEligible,
}

impl ErrorCode {
    /// HTTP status code for this error.
    pub const fn status(&self) -> u16 {
        match self {
            ErrorCode::InvalidRequest | ErrorCode::ValidationError => 400,
            ErrorCode::Unauthorized => 401,
            ErrorCode::NotFound => 404,
            ErrorCode::Conflict => 409,
            ErrorCode::InsufficientPoints | ErrorCode::NotEligible => 422,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error carrying every field violation.
    pub fn validation(errors: ValidationErrors) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: errors.to_string(),
            fields: Some(errors),
        }
    }

    /// HTTP status code to respond with.
    pub fn status(&self) -> u16 {
        self.code.status()
    }

    /// JSON response body.
    pub fn body(&self) -> Value {
        match &self.fields {
            Some(errors) => Value::Object(
                errors
                    .field_map()
                    .into_iter()
                    .map(|(field, messages)| (field.to_string(), Value::from(messages)))
                    .collect(),
            ),
            None => json!({ "code": self.code, "message": self.message }),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::Validation(errors) => ApiError::validation(errors),
            CoreError::InvalidPromotionStatus { .. }
            | CoreError::PromotionNotLive(_)
            | CoreError::RedemptionLimitReached { .. } => {
                ApiError::new(ErrorCode::Conflict, message)
            }
            CoreError::InsufficientPoints { .. } => {
                ApiError::new(ErrorCode::InsufficientPoints, message)
            }
            CoreError::ConditionsNotMet(_) => ApiError::new(ErrorCode::NotEligible, message),
            CoreError::CustomerRequired => ApiError::new(ErrorCode::Unauthorized, message),
            CoreError::UnknownVariant { .. } => ApiError::new(ErrorCode::InvalidRequest, message),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation(errors)
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        let mut errors = ValidationErrors::new();
        errors.push(error);
        ApiError::validation(errors)
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::not_found("Promotion", &id.to_string()),
            StoreError::AlreadyExists(_) => ApiError::new(ErrorCode::Conflict, err.to_string()),
        }
    }
}

/// Converts body parse failures to API errors.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::debug!(error = %err, "Rejected malformed request body");
        ApiError::new(
            ErrorCode::InvalidRequest,
            format!("Malformed request body: {}", err),
        )
    }
}
