//! # Validation Module
//!
//! Numeric checks shared by the item model and the packer.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Carrier config (parcel-carrier)                              │
//! │  └── Limits must be positive before a quote starts                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Measures must be finite and non-negative                          │
//! │  └── Limits must be finite and strictly positive                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Packer                                                       │
//! │  └── Oversize check against the limits                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use parcel_core::validation::{validate_measure, validate_limit};
//!
//! assert!(validate_measure("weight", 2.5).is_ok());
//! assert!(validate_limit("max_weight", 0.0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an item measure (weight or volume).
///
/// ## Rules
/// - Must be finite (no NaN, no infinity)
/// - Must be >= 0 (weightless items are allowed)
///
/// ## Example
/// ```rust
/// use parcel_core::validation::validate_measure;
///
/// assert!(validate_measure("weight", 0.0).is_ok());
/// assert!(validate_measure("weight", -0.1).is_err());
/// assert!(validate_measure("volume", f64::NAN).is_err());
/// ```
pub fn validate_measure(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

/// Validates a per-parcel limit.
///
/// ## Rules
/// - Must be finite
/// - Must be > 0; a zero cap would reject every item
pub fn validate_limit(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Builds the error for a value outside an accepted set.
pub fn not_allowed(field: &str, value: &str, allowed: &[&str]) -> ValidationError {
    ValidationError::NotAllowed {
        field: field.to_string(),
        value: value.to_string(),
        allowed: allowed.iter().map(|a| a.to_string()).collect(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
