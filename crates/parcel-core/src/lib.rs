//! # parcel-core: Pure Packing Logic for Parcel Quote
//!
//! This crate is the **heart** of Parcel Quote. It decides how a cart is split
//! into parcels before any shipping price is requested, as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Parcel Quote Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Store checkout (external)                       │   │
//! │  │      Cart lines ──► Rate request ──► Shipping method shown      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              parcel-carrier (config + rate collector)           │   │
//! │  │     resolve limits ──► pack ──► price each parcel ──► tax/duty  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ parcel-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  packer   │  │   units   │  │   money   │  │   │
//! │  │   │   Item    │  │   pack    │  │  LB / KG  │  │   cents   │  │   │
//! │  │   │  Parcel   │  │  expand   │  │    IN3    │  │  display  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CONFIG FILES • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Parcel, ParcelLimits, ProductType)
//! - [`packer`] - The greedy parcel packer
//! - [`units`] - Weight/volume units and conversion
//! - [`money`] - Integer-cent money for prices, tax and duty
//! - [`error`] - Domain error types
//! - [`validation`] - Numeric input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use parcel_core::{pack, Item, ParcelLimits, PackError};
//!
//! let limits = ParcelLimits::new(20.0, 10.0).unwrap();
//!
//! let parcels = pack(&[Item::simple(5.0, 2.0, 3)], limits).unwrap();
//! assert_eq!(parcels.len(), 1);
//! assert_eq!(parcels[0].weight, 15.0);
//!
//! let err = pack(&[Item::simple(25.0, 2.0, 1)], limits).unwrap_err();
//! assert!(matches!(err, PackError::Oversize { .. }));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod packer;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{PackError, PackResult, ValidationError};
pub use money::Money;
pub use packer::{expand_units, pack, PackRequest, PackRequestItem, PackResponse};
pub use types::*;
pub use units::{WeightUnit, POUND_TO_KILOGRAM, QUOTED_VOLUME_UNIT};
