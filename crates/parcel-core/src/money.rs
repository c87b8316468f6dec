//! # Money Module
//!
//! Provides the `Money` type for shipping prices, tax and duty.
//!
//! ## Where Floats Stop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Logistics API          Pricing seam              Rate collector        │
//! │  ─────────────          ────────────              ──────────────        │
//! │  cost.value: 12.345 ──► Money::from_decimal() ──► Σ parcels (cents)     │
//! │  totalTax:   3.1    ──► Money::from_decimal() ──► shipping + tax        │
//! │                                                                         │
//! │  Decimal amounts are converted exactly once, at the pricing seam.       │
//! │  Every sum after that is integer cents.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use parcel_core::money::Money;
//!
//! let parcel_a = Money::from_cents(1250);      // 12.50
//! let parcel_b = Money::from_decimal(7.255);   // 7.26
//! let total = parcel_a + parcel_b;
//! assert_eq!(total.to_string(), "19.76");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// The currency itself travels separately with the rate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount from the logistics API into cents.
    ///
    /// Rounds half away from zero. Non-finite input becomes zero; the
    /// pricing seam rejects such payloads before they get here.
    ///
    /// ## Example
    /// ```rust
    /// use parcel_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.5).cents(), 1250);
    /// assert_eq!(Money::from_decimal(0.005).cents(), 1);
    /// assert_eq!(Money::from_decimal(-2.675).cents(), -268);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        // 1.005 * 100 is 100.4999..., nudge it back over the half.
        let scaled = amount * 100.0;
        let nudged = scaled + scaled.signum() * 1e-9;
        Money(nudged.round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal, for request bodies only.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is positive (greater than zero).
    ///
    /// A carrier only offers a method when its shipping price is positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Formats with a currency symbol prefix, e.g. `£12.50`.
    ///
    /// ## Example
    /// ```rust
    /// use parcel_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(123450).with_symbol("€"), "€1,234.50");
    /// assert_eq!(Money::from_cents(-99).with_symbol("$"), "-$0.99");
    /// ```
    pub fn with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}{}", sign, symbol, Money(self.0.abs()))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two decimals with thousands separators (`1,234.50`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = (abs / 100).to_string();
        let minor = abs % 100;

        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        for (i, ch) in major.chars().enumerate() {
            if i > 0 && (major.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{}{}.{:02}", sign, grouped, minor)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_rounding() {
        assert_eq!(Money::from_decimal(10.99).cents(), 1099);
        assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_decimal(1.005).cents(), 101);
        assert_eq!(Money::from_decimal(0.0).cents(), 0);
        assert_eq!(Money::from_decimal(f64::NAN).cents(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(123_456_789).to_string(), "1,234,567.89");
        assert_eq!(Money::from_cents(100_000).to_string(), "1,000.00");
    }

    #[test]
    fn test_running_total_of_parcel_prices() {
        let mut total = Money::zero();
        for cents in [1250, 830, 5] {
            total += Money::from_cents(cents);
        }
        assert_eq!(total.cents(), 2085);
        assert_eq!((total + Money::from_cents(15)).cents(), 2100);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(!Money::zero().is_positive());
        assert_eq!(Money::default(), Money::zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(!Money::from_cents(-1).is_positive());
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Money::from_cents(1250).to_decimal(), 12.5);
    }
}
