//! # Domain Types
//!
//! Core domain types used by the packer and the carrier.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │    UnitItem     │   │     Parcel      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  weight         │──►│  weight         │──►│  weight (Σ)     │       │
//! │  │  volume         │ × │  volume         │   │  volume (Σ)     │       │
//! │  │  quantity       │qty└─────────────────┘   │  unit_count     │       │
//! │  │  product_type   │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  ProductType    │   │  ParcelLimits   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  Simple ✓       │   │  max_weight > 0 │                             │
//! │  │  Configurable   │   │  max_volume > 0 │                             │
//! │  │  Bundle ...     │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{PackError, PackResult};
use crate::validation::validate_limit;

/// Volume assumed for an item with missing dimensions.
pub const DEFAULT_ITEM_MIN_VOLUME: f64 = 1.0;

// =============================================================================
// Product Type
// =============================================================================

/// Catalog product type of a cart line.
///
/// Only simple products are physical units. Configurable and bundle parents
/// show up in the cart next to their simple children and must not be counted
/// twice; virtual and downloadable products never ship.
///
/// Serialized as the lowercase type code; parsed case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductType {
    #[default]
    Simple,
    Configurable,
    Bundle,
    Grouped,
    Virtual,
    Downloadable,
    /// Any type code this crate does not know about.
    Other(String),
}

impl ProductType {
    /// Parses a platform type code. Unknown codes are kept, not rejected.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "simple" => ProductType::Simple,
            "configurable" => ProductType::Configurable,
            "bundle" => ProductType::Bundle,
            "grouped" => ProductType::Grouped,
            "virtual" => ProductType::Virtual,
            "downloadable" => ProductType::Downloadable,
            other => ProductType::Other(other.to_string()),
        }
    }

    /// Returns true when the line contributes weight and volume to parcels.
    #[inline]
    pub fn is_simple(&self) -> bool {
        matches!(self, ProductType::Simple)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductType::Simple => write!(f, "simple"),
            ProductType::Configurable => write!(f, "configurable"),
            ProductType::Bundle => write!(f, "bundle"),
            ProductType::Grouped => write!(f, "grouped"),
            ProductType::Virtual => write!(f, "virtual"),
            ProductType::Downloadable => write!(f, "downloadable"),
            ProductType::Other(code) => write!(f, "{}", code),
        }
    }
}

impl From<String> for ProductType {
    fn from(code: String) -> Self {
        ProductType::from_code(&code)
    }
}

impl From<ProductType> for String {
    fn from(product_type: ProductType) -> Self {
        product_type.to_string()
    }
}

// =============================================================================
// Dimensions
// =============================================================================

/// Product box dimensions as stored in the catalog.
///
/// Each side is optional because catalog attributes are often left blank.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Dimensions {
    /// Creates fully specified dimensions.
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Dimensions {
            length: Some(length),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Returns `length × width × height`, or [`DEFAULT_ITEM_MIN_VOLUME`]
    /// when any side is missing or zero.
    ///
    /// ## Example
    /// ```rust
    /// use parcel_core::types::Dimensions;
    ///
    /// assert_eq!(Dimensions::new(2.0, 3.0, 4.0).volume(), 24.0);
    /// assert_eq!(Dimensions::default().volume(), 1.0);
    /// ```
    pub fn volume(&self) -> f64 {
        match (self.length, self.width, self.height) {
            (Some(l), Some(w), Some(h)) if l != 0.0 && w != 0.0 && h != 0.0 => l * w * h,
            _ => DEFAULT_ITEM_MIN_VOLUME,
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// One order line as the packer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Weight of a single unit.
    pub weight: f64,

    /// Volume of a single unit.
    pub volume: f64,

    /// Number of units on the line.
    pub quantity: u32,

    /// Catalog product type; only simple products are packed.
    #[serde(default)]
    pub product_type: ProductType,
}

impl Item {
    /// Creates a simple-product line.
    pub fn simple(weight: f64, volume: f64, quantity: u32) -> Self {
        Item {
            weight,
            volume,
            quantity,
            product_type: ProductType::Simple,
        }
    }

    /// Creates a line whose volume comes from catalog dimensions.
    pub fn with_dimensions(
        weight: f64,
        dimensions: Dimensions,
        quantity: u32,
        product_type: ProductType,
    ) -> Self {
        Item {
            weight,
            volume: dimensions.volume(),
            quantity,
            product_type,
        }
    }

    /// Returns true when this line takes part in packing.
    #[inline]
    pub fn is_packable(&self) -> bool {
        self.product_type.is_simple()
    }
}

/// One physical unit after expanding an item's quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitItem {
    pub weight: f64,
    pub volume: f64,
}

// =============================================================================
// Parcel Limits
// =============================================================================

/// Per-parcel weight and volume caps.
///
/// Constructed through [`ParcelLimits::new`], so a value of this type always
/// holds finite, strictly positive caps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelLimits {
    max_weight: f64,
    max_volume: f64,
}

impl ParcelLimits {
    /// Creates limits, rejecting zero, negative and non-finite caps.
    ///
    /// ## Example
    /// ```rust
    /// use parcel_core::types::ParcelLimits;
    ///
    /// assert!(ParcelLimits::new(20.0, 10.0).is_ok());
    /// assert!(ParcelLimits::new(0.0, 10.0).is_err());
    /// ```
    pub fn new(max_weight: f64, max_volume: f64) -> PackResult<Self> {
        validate_limit("max_weight", max_weight).map_err(|_| PackError::InvalidLimits {
            field: "max_weight",
            value: max_weight,
        })?;
        validate_limit("max_volume", max_volume).map_err(|_| PackError::InvalidLimits {
            field: "max_volume",
            value: max_volume,
        })?;

        Ok(ParcelLimits {
            max_weight,
            max_volume,
        })
    }

    #[inline]
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    #[inline]
    pub fn max_volume(&self) -> f64 {
        self.max_volume
    }

    /// A single unit at or beyond either cap can never ship.
    #[inline]
    pub fn is_oversize(&self, unit: &UnitItem) -> bool {
        unit.weight >= self.max_weight || unit.volume >= self.max_volume
    }

    /// Whether running totals still fit. Equality with a cap fits.
    #[inline]
    pub fn fits(&self, weight: f64, volume: f64) -> bool {
        !(weight > self.max_weight || volume > self.max_volume)
    }

    /// The abort error for this pair of caps.
    pub fn oversize_error(&self) -> PackError {
        PackError::Oversize {
            max_weight: self.max_weight,
            max_volume: self.max_volume,
        }
    }
}

// =============================================================================
// Parcel
// =============================================================================

/// A packed parcel: aggregate weight and volume of its unit-items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Parcel {
    pub weight: f64,
    pub volume: f64,
    /// How many unit-items went into this parcel.
    pub unit_count: usize,
}

impl Parcel {
    /// Opens a parcel holding a single unit.
    pub(crate) fn open(unit: &UnitItem) -> Self {
        Parcel {
            weight: unit.weight,
            volume: unit.volume,
            unit_count: 1,
        }
    }

    /// Adds a unit to the running totals.
    pub(crate) fn push(&mut self, unit: &UnitItem) {
        self.weight += unit.weight;
        self.volume += unit.volume;
        self.unit_count += 1;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_from_code() {
        assert_eq!(ProductType::from_code("simple"), ProductType::Simple);
        assert_eq!(ProductType::from_code("Bundle"), ProductType::Bundle);
        assert_eq!(
            ProductType::from_code("giftcard"),
            ProductType::Other("giftcard".to_string())
        );
        assert!(ProductType::Simple.is_simple());
        assert!(!ProductType::Configurable.is_simple());
    }

    #[test]
    fn test_dimensions_volume_defaults() {
        assert_eq!(Dimensions::new(10.0, 5.0, 2.0).volume(), 100.0);

        let missing_height = Dimensions {
            length: Some(10.0),
            width: Some(5.0),
            height: None,
        };
        assert_eq!(missing_height.volume(), DEFAULT_ITEM_MIN_VOLUME);
        assert_eq!(Dimensions::new(10.0, 0.0, 2.0).volume(), DEFAULT_ITEM_MIN_VOLUME);
    }

    #[test]
    fn test_limits_reject_non_positive() {
        assert!(matches!(
            ParcelLimits::new(0.0, 1.0),
            Err(PackError::InvalidLimits {
                field: "max_weight",
                ..
            })
        ));
        assert!(matches!(
            ParcelLimits::new(1.0, -1.0),
            Err(PackError::InvalidLimits {
                field: "max_volume",
                ..
            })
        ));
        assert!(ParcelLimits::new(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_limit_comparisons_are_asymmetric() {
        let limits = ParcelLimits::new(20.0, 10.0).unwrap();

        // A lone unit exactly at the cap is oversize...
        let at_cap = UnitItem {
            weight: 20.0,
            volume: 1.0,
        };
        assert!(limits.is_oversize(&at_cap));

        // ...but running totals that land exactly on the cap still fit.
        assert!(limits.fits(20.0, 10.0));
        assert!(!limits.fits(20.0001, 10.0));
    }

    #[test]
    fn test_item_deserializes_from_camel_case() {
        let json = r#"{"weight":1.5,"volume":3.0,"quantity":2,"productType":"configurable"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, 2);
        assert!(!item.is_packable());

        let json = r#"{"weight":1.5,"volume":3.0,"quantity":2}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(item.is_packable());
    }

    #[test]
    fn test_product_type_serde_ignores_case() {
        let json = r#"{"weight":1,"volume":1,"quantity":1,"productType":"Simple"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.product_type, ProductType::Simple);
        assert!(item.is_packable());

        let bundle: ProductType = serde_json::from_str(r#""BUNDLE""#).unwrap();
        assert_eq!(bundle, ProductType::Bundle);

        let other: ProductType = serde_json::from_str(r#""giftcard""#).unwrap();
        assert_eq!(other, ProductType::Other("giftcard".to_string()));

        assert_eq!(
            serde_json::to_string(&ProductType::Configurable).unwrap(),
            "\"configurable\""
        );
    }
}
