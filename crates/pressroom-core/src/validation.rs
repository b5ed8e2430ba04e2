//! # Validation Module
//!
//! Single-field validators for promotion submissions.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin form (TypeScript)                                      │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - one field, one rule, one ValidationError       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: promotions::schema - runs every field validator plus the     │
//! │           cross-field rules and collects all failures                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tagged condition and reward values arrive as arbitrary JSON, so the
//! shape validators here take a [`serde_json::Value`] and return the typed
//! value on success.
//!
//! ## Usage
//! ```rust
//! use pressroom_core::validation::{validate_title, validate_points_cost};
//!
//! assert!(validate_title("Double points weekend").is_ok());
//! assert_eq!(validate_points_cost(250.0).unwrap(), 250);
//! assert!(validate_points_cost(-1.0).is_err());
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::error::ValidationError;
use crate::{MAX_PROMOTION_DESCRIPTION_LEN, MAX_PROMOTION_TITLE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a promotion title.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 100 characters
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_PROMOTION_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_PROMOTION_TITLE_LEN,
        });
    }

    Ok(())
}

/// Validates an optional promotion description (at most 500 characters).
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    match description {
        Some(text) if text.chars().count() > MAX_PROMOTION_DESCRIPTION_LEN => {
            Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_PROMOTION_DESCRIPTION_LEN,
            })
        }
        _ => Ok(()),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a points cost and returns it as whole points.
///
/// ## Rules
/// - Must be a whole number
/// - Must be non-negative (0 means free)
pub fn validate_points_cost(points: f64) -> ValidationResult<i64> {
    if !points.is_finite() || points.fract() != 0.0 {
        return Err(ValidationError::InvalidFormat {
            field: "pointsCost".to_string(),
            reason: "must be a whole number of points".to_string(),
        });
    }

    if points < 0.0 || points > i64::MAX as f64 {
        return Err(ValidationError::OutOfRange {
            field: "pointsCost".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(points as i64)
}

/// Validates an optional redemption cap.
///
/// ## Rules
/// - Absent means unlimited
/// - When present, a whole number of at least 1
pub fn validate_max_redemptions(max: Option<f64>) -> ValidationResult<Option<u32>> {
    let Some(max) = max else {
        return Ok(None);
    };

    if !max.is_finite() || max.fract() != 0.0 || max < 1.0 || max > f64::from(u32::MAX) {
        return Err(ValidationError::OutOfRange {
            field: "maxRedemptions".to_string(),
            min: 1,
            max: i64::from(u32::MAX),
        });
    }

    Ok(Some(max as u32))
}

/// Validates cart size against the configured maximum number of lines.
pub fn validate_cart_size(lines: usize, max_lines: usize) -> ValidationResult<()> {
    if lines > max_lines {
        return Err(ValidationError::OutOfRange {
            field: "cart.items".to_string(),
            min: 0,
            max: max_lines as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Tagged Value Validators
// =============================================================================

/// Requires a finite number strictly greater than zero.
pub fn positive_number(field: &str, value: &Value) -> ValidationResult<f64> {
    let number = expect_number(field, value)?;
    if number <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(number)
}

/// Requires a percentage in `(0, 100]`.
pub fn percentage(field: &str, value: &Value) -> ValidationResult<f64> {
    let number = expect_number(field, value)?;
    if number <= 0.0 || number > 100.0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(number)
}

/// Requires a non-empty string.
pub fn non_empty_string(field: &str, value: &Value) -> ValidationResult<String> {
    match value.as_str() {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        Some(_) => Err(ValidationError::Required {
            field: field.to_string(),
        }),
        None => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected a string".to_string(),
        }),
    }
}

/// Requires a non-empty array of non-empty strings.
pub fn product_id_list(field: &str, value: &Value) -> ValidationResult<Vec<String>> {
    let invalid = || ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected a non-empty list of product ids".to_string(),
    };

    let items = value.as_array().ok_or_else(invalid)?;
    if items.is_empty() {
        return Err(invalid());
    }

    items
        .iter()
        .map(|item| match item.as_str() {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => Err(invalid()),
        })
        .collect()
}

fn expect_number(field: &str, value: &Value) -> ValidationResult<f64> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected a number".to_string(),
        })
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as
/// midnight UTC.
pub fn parse_date(field: &str, raw: &str) -> ValidationResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected an ISO-8601 date".to_string(),
        })
}

/// When both dates are set the window must not be empty.
pub fn validate_date_order(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> ValidationResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if start >= end => Err(ValidationError::DateOrder {
            field: "endDate".to_string(),
        }),
        _ => Ok(()),
    }
}

/// A start date, when set, must lie strictly after `now`.
pub fn validate_future_start(
    start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ValidationResult<()> {
    match start {
        Some(start) if start <= now => Err(ValidationError::NotInFuture {
            field: "startDate".to_string(),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Free business cards").is_ok());
        assert!(validate_title(&"A".repeat(100)).is_ok());

        assert!(matches!(
            validate_title("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_title(&"A".repeat(101)),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some("")).is_ok());
        assert!(validate_description(Some(&"é".repeat(500))).is_ok());
        assert!(validate_description(Some(&"x".repeat(501))).is_err());
    }

    #[test]
    fn test_validate_points_cost() {
        assert_eq!(validate_points_cost(0.0).unwrap(), 0);
        assert_eq!(validate_points_cost(500.0).unwrap(), 500);
        assert!(validate_points_cost(-1.0).is_err());
        assert!(validate_points_cost(12.5).is_err());
        assert!(validate_points_cost(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_max_redemptions() {
        assert_eq!(validate_max_redemptions(None).unwrap(), None);
        assert_eq!(validate_max_redemptions(Some(1.0)).unwrap(), Some(1));
        assert!(validate_max_redemptions(Some(0.0)).is_err());
        assert!(validate_max_redemptions(Some(2.5)).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(50, 50).is_ok());
        assert!(validate_cart_size(51, 50).is_err());
    }

    #[test]
    fn test_positive_number() {
        assert_eq!(positive_number("conditions", &json!(50)).unwrap(), 50.0);
        assert!(matches!(
            positive_number("conditions", &json!(0)),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            positive_number("conditions", &json!("50")),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(percentage("rewards", &json!(100)).is_ok());
        assert!(percentage("rewards", &json!(0.5)).is_ok());
        assert!(percentage("rewards", &json!(0)).is_err());
        assert!(percentage("rewards", &json!(100.01)).is_err());
    }

    #[test]
    fn test_string_shapes() {
        assert_eq!(non_empty_string("rewards", &json!("p1")).unwrap(), "p1");
        assert!(non_empty_string("rewards", &json!("")).is_err());
        assert!(non_empty_string("rewards", &json!(3)).is_err());
        assert_eq!(non_empty_string("rewards", &json!(" ")).unwrap(), " ");

        assert_eq!(
            product_id_list("conditions", &json!(["p1", "p2"])).unwrap(),
            vec!["p1".to_string(), "p2".to_string()]
        );
        assert!(product_id_list("conditions", &json!([])).is_err());
        assert!(product_id_list("conditions", &json!(["p1", ""])).is_err());
        assert!(product_id_list("conditions", &json!("p1")).is_err());
        assert_eq!(
            product_id_list("conditions", &json!([" p1 "])).unwrap(),
            vec![" p1 ".to_string()]
        );
    }

    #[test]
    fn test_parse_date() {
        let parsed = parse_date("startDate", "2026-11-01T09:30:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-11-01T07:30:00+00:00");

        let parsed = parse_date("startDate", "2026-11-01").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-11-01T00:00:00+00:00");

        assert!(parse_date("startDate", "next tuesday").is_err());
    }

    #[test]
    fn test_date_rules() {
        let now = Utc::now();
        let later = now + Duration::days(1);

        assert!(validate_date_order(Some(now), Some(later)).is_ok());
        assert!(validate_date_order(Some(later), Some(now)).is_err());
        assert!(validate_date_order(Some(now), Some(now)).is_err());
        assert!(validate_date_order(None, Some(now)).is_ok());

        assert!(validate_future_start(Some(later), now).is_ok());
        assert!(validate_future_start(Some(now), now).is_err());
        assert!(validate_future_start(None, now).is_ok());
    }
}
