//! # Validation Module
//!
//! Input validation utilities for Ured.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser UI                                                   │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API handler (Rust)                                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: required fields, ranges                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints (invoices.number, users.username)              │
//! │  └── Index-backed lookups                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a required text field is present and non-blank.
///
/// Returns the trimmed value.
///
/// ## Example
/// ```rust
/// use ured_core::validation::validate_required;
///
/// assert_eq!(validate_required("name", "  Pekara  ").unwrap(), "Pekara");
/// assert!(validate_required("name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Validates an optional text field, treating blank as absent.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validates a referenced entity id (required, must be a UUID).
pub fn validate_entity_id(field: &str, id: &str) -> ValidationResult<String> {
    let id = validate_required(field, id)?;

    uuid::Uuid::parse_str(&id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(id)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount that must be strictly positive.
pub fn validate_positive_amount(field: &str, amount: f64) -> ValidationResult<()> {
    if !(amount > 0.0) {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a monetary amount that may be zero but not negative.
pub fn validate_non_negative_amount(field: &str, amount: f64) -> ValidationResult<()> {
    if amount < 0.0 || amount.is_nan() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("name", "Pekara").unwrap(), "Pekara");
        assert_eq!(validate_required("name", "  x  ").unwrap(), "x");

        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "   ").is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some(" 71000 ")), Some("71000".to_string()));
        assert_eq!(normalize_optional(Some("   ")), None);
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn test_validate_entity_id() {
        assert!(validate_entity_id("clientId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_entity_id("clientId", "").is_err());
        assert!(validate_entity_id("clientId", "not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount("iznos", 120.50).is_ok());
        assert!(validate_positive_amount("iznos", 0.0).is_err());
        assert!(validate_positive_amount("iznos", -5.0).is_err());
        assert!(validate_positive_amount("iznos", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_non_negative_amount() {
        assert!(validate_non_negative_amount("price", 0.0).is_ok());
        assert!(validate_non_negative_amount("price", 10.0).is_ok());
        assert!(validate_non_negative_amount("price", -0.01).is_err());
        assert!(validate_non_negative_amount("price", f64::NAN).is_err());
    }
}
