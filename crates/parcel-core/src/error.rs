//! # Error Types
//!
//! Domain-specific error types for parcel-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  parcel-core errors (this file)                                        │
//! │  ├── PackError        - Packing aborted (oversize, bad input)          │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  parcel-carrier errors (separate crate)                                │
//! │  └── CarrierError     - Config, pricing service failures               │
//! │                                                                         │
//! │  Flow: ValidationError → PackError → CarrierError → RateOutcome        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Pack Error
// =============================================================================

/// Errors that abort a packing call.
///
/// No partial parcel list is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PackError {
    /// A single unit-item meets or exceeds one of the parcel limits.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: [Sofa 80 lb]
    ///      │
    ///      ▼
    /// pack(max_weight: 61.73)
    ///      │
    ///      ▼
    /// Oversize { max_weight: 61.73, max_volume: 61023.7 }
    ///      │
    ///      ▼
    /// Checkout hides the carrier and shows the configured error message
    /// ```
    #[error(
        "Sorry, one of the items is overweight or oversized. \
         Maximum package weight allowed is {max_weight} and volume is {max_volume}"
    )]
    Oversize { max_weight: f64, max_volume: f64 },

    /// Limits are zero, negative, or not finite.
    #[error("Invalid parcel limit {field}: {value} (must be a positive number)")]
    InvalidLimits { field: &'static str, value: f64 },

    /// An item carries a weight or volume the packer cannot reason about.
    #[error("Invalid item at position {index}: {source}")]
    InvalidItem {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

impl PackError {
    /// Returns true for the oversize abort (a user-facing condition).
    pub fn is_oversize(&self) -> bool {
        matches!(self, PackError::Oversize { .. })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value must be zero or greater.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: f64 },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// NaN or infinity.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value is not in allowed set.
    #[error("{field} '{value}' must be one of: {allowed:?}")]
    NotAllowed {
        field: String,
        value: String,
        allowed: Vec<String>,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PackError.
pub type PackResult<T> = Result<T, PackError>;

// =============================================================================
// Unit Tests
// =============================================================================
