//! # Parcel Packer
//!
//! Groups cart items into parcels under per-parcel weight and volume caps.
//! The number of parcels decides how many remote price lookups a quote costs.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. EXPAND     [A×2, B×1, Bundle×1]  ──►  [A, A, B]                      │
//! │                non-simple lines are dropped, quantity becomes units     │
//! │                                                                         │
//! │  2. CHECK      any unit with weight >= max or volume >= max?            │
//! │                yes ──► abort the whole call (Oversize)                  │
//! │                                                                         │
//! │  3. FILL       open parcel with next unit, keep adding while both       │
//! │                running totals stay <= max, close at first misfit        │
//! │                                                                         │
//! │                [A, A, B]   max (20, 10)                                  │
//! │                 └─┬─┘ └┘                                                │
//! │                 {20,10} {8,3}                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The fill is a single forward pass. There is no best-fit and no skipping
//! ahead: the first unit that does not fit closes the parcel, even if a
//! smaller unit further down would.
//!
//! ## Usage
//! ```rust
//! use parcel_core::packer::pack;
//! use parcel_core::types::{Item, ParcelLimits};
//!
//! let items = vec![Item::simple(10.0, 5.0, 2), Item::simple(8.0, 3.0, 1)];
//! let limits = ParcelLimits::new(20.0, 10.0).unwrap();
//!
//! let parcels = pack(&items, limits).unwrap();
//! assert_eq!(parcels.len(), 2);
//! assert_eq!((parcels[0].weight, parcels[0].volume), (20.0, 10.0));
//! assert_eq!((parcels[1].weight, parcels[1].volume), (8.0, 3.0));
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{PackError, PackResult};
use crate::types::{Item, Parcel, ParcelLimits, ProductType, UnitItem};
use crate::validation::validate_measure;

// =============================================================================
// Expansion
// =============================================================================

/// Expands packable items into unit-items, in input order.
///
/// Lines that are not simple products are skipped silently. Each remaining
/// line contributes `quantity` identical units; a zero quantity contributes
/// nothing.
pub fn expand_units(items: &[Item]) -> PackResult<Vec<UnitItem>> {
    let total: usize = items
        .iter()
        .filter(|i| i.is_packable())
        .map(|i| i.quantity as usize)
        .sum();
    let mut units = Vec::with_capacity(total);

    for (index, item) in items.iter().enumerate() {
        if let Some(unit) = line_unit(index, item)? {
            units.extend(std::iter::repeat(unit).take(item.quantity as usize));
        }
    }

    Ok(units)
}

/// The validated unit of one line, or `None` for lines that are not packed.
fn line_unit(index: usize, item: &Item) -> PackResult<Option<UnitItem>> {
    if !item.is_packable() {
        return Ok(None);
    }

    validate_measure("weight", item.weight)
        .and_then(|_| validate_measure("volume", item.volume))
        .map_err(|source| PackError::InvalidItem { index, source })?;

    Ok(Some(UnitItem {
        weight: item.weight,
        volume: item.volume,
    }))
}

// =============================================================================
// Packing
// =============================================================================

/// Packs items into parcels.
///
/// ## Returns
/// - `Ok(parcels)` in consumption order; empty when nothing is packable
/// - `Err(PackError::Oversize)` when any single unit reaches a cap
/// - `Err(PackError::InvalidItem)` for negative or non-finite measures
///
/// ## Boundaries
/// A unit is oversize when `weight >= max_weight || volume >= max_volume`.
/// A unit is rejected from an open parcel only when a running total would
/// become strictly greater than its cap. Both comparisons are deliberate and
/// must stay as they are.
///
/// Every unit of a line is identical, so the oversize check runs once per
/// line before anything is expanded. Lines with quantity 0 have no units
/// and are never oversize.
pub fn pack(items: &[Item], limits: ParcelLimits) -> PackResult<Vec<Parcel>> {
    for (index, item) in items.iter().enumerate() {
        if item.quantity == 0 {
            continue;
        }
        if let Some(unit) = line_unit(index, item)? {
            if limits.is_oversize(&unit) {
                return Err(limits.oversize_error());
            }
        }
    }

    let units = expand_units(items)?;
    Ok(fill(&units, limits))
}

/// Greedy sequential fill over pre-checked units.
fn fill(units: &[UnitItem], limits: ParcelLimits) -> Vec<Parcel> {
    let mut parcels = Vec::new();
    let mut rest = units.iter().peekable();

    while let Some(first) = rest.next() {
        let mut parcel = Parcel::open(first);

        while let Some(next) = rest.peek() {
            if !limits.fits(parcel.weight + next.weight, parcel.volume + next.volume) {
                break;
            }
            parcel.push(next);
            rest.next();
        }

        parcels.push(parcel);
    }

    parcels
}

// =============================================================================
// Request / Response DTOs
// =============================================================================

/// One line of a pack request, in the shape callers send over JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackRequestItem {
    pub weight: f64,
    pub volume: f64,
    pub quantity: u32,
    #[serde(default = "default_true")]
    pub is_simple_product: bool,
}

fn default_true() -> bool {
    true
}

impl From<&PackRequestItem> for Item {
    fn from(line: &PackRequestItem) -> Self {
        Item {
            weight: line.weight,
            volume: line.volume,
            quantity: line.quantity,
            product_type: if line.is_simple_product {
                ProductType::Simple
            } else {
                ProductType::Configurable
            },
        }
    }
}

/// A full pack request: items plus the caps to pack them under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackRequest {
    pub items: Vec<PackRequestItem>,
    pub max_weight: f64,
    pub max_volume: f64,
}

/// Result of a pack call in the `{ parcels, error }` shape.
///
/// On failure `parcels` is empty and `error` carries the message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PackResponse {
    pub parcels: Vec<Parcel>,
    pub error: Option<String>,
}

impl From<PackResult<Vec<Parcel>>> for PackResponse {
    fn from(result: PackResult<Vec<Parcel>>) -> Self {
        match result {
            Ok(parcels) => PackResponse {
                parcels,
                error: None,
            },
            Err(e) => PackResponse {
                parcels: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

impl PackRequest {
    /// Runs the packer over this request.
    pub fn pack(&self) -> PackResult<Vec<Parcel>> {
        let limits = ParcelLimits::new(self.max_weight, self.max_volume)?;
        let items: Vec<Item> = self.items.iter().map(Item::from).collect();
        pack(&items, limits)
    }

    /// Runs the packer and folds the outcome into a response.
    pub fn respond(&self) -> PackResponse {
        self.pack().into()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
