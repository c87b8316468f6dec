//! # Units
//!
//! Weight and volume units understood by the carrier.
//!
//! ## Code Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Store setting        Rust type                   Wire code             │
//! │  ─────────────        ─────────                   ─────────             │
//! │  "lbs"         ──►    WeightUnit::Pounds     ──►  "LB"                  │
//! │  "kgs"         ──►    WeightUnit::Kilograms  ──►  "KG"                  │
//! │  (any)         ──►    QUOTED_VOLUME_UNIT     ──►  "IN3"                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Volumes are always quoted in cubic inches; only weight follows the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::validation::not_allowed;

/// Pounds to kilograms, as applied to the default weight cap.
pub const POUND_TO_KILOGRAM: f64 = 0.4536;

/// Wire code of the volume unit every quote is sent in.
pub const QUOTED_VOLUME_UNIT: &str = "IN3";

// =============================================================================
// Weight Unit
// =============================================================================

/// Weight unit configured on the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    /// Imperial pounds (store default).
    #[default]
    #[serde(rename = "lbs")]
    Pounds,

    /// Metric kilograms.
    #[serde(rename = "kgs")]
    Kilograms,
}

impl WeightUnit {
    /// Code sent to the logistics API.
    pub fn wire_code(&self) -> &'static str {
        match self {
            WeightUnit::Pounds => "LB",
            WeightUnit::Kilograms => "KG",
        }
    }

    /// Converts a weight expressed in pounds into this unit.
    ///
    /// ## Example
    /// ```rust
    /// use parcel_core::units::WeightUnit;
    ///
    /// assert_eq!(WeightUnit::Pounds.convert_pounds(10.0), 10.0);
    /// assert!((WeightUnit::Kilograms.convert_pounds(10.0) - 4.536).abs() < 1e-9);
    /// ```
    pub fn convert_pounds(&self, pounds: f64) -> f64 {
        match self {
            WeightUnit::Pounds => pounds,
            WeightUnit::Kilograms => pounds * POUND_TO_KILOGRAM,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Pounds => write!(f, "lbs"),
            WeightUnit::Kilograms => write!(f, "kgs"),
        }
    }
}

impl FromStr for WeightUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lbs" | "lb" => Ok(WeightUnit::Pounds),
            "kgs" | "kg" => Ok(WeightUnit::Kilograms),
            _ => Err(not_allowed("weight_unit", s, &["lbs", "kgs"])),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
