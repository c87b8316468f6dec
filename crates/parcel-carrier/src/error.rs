//! # Carrier Error Types
//!
//! Error types for configuration and rate collection.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Carrier Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Packing      │  │     Pricing             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Pack(Oversize) │  │  PricingFailed          │ │
//! │  │  ConfigLoad/Save│  │  Pack(Invalid*) │  │  InvalidAmount          │ │
//! │  │  Io / Toml      │  │                 │  │                         │ │
//! │  │  InvalidArgument│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant ends the current quote attempt. Nothing is retried: the
//! rate collector turns the error into a carrier error message (or hides
//! the method) and logs the detail.

use parcel_core::PackError;
use thiserror::Error;

/// Result type alias for carrier operations.
pub type CarrierResult<T> = Result<T, CarrierError>;

/// Carrier error type covering config, packing and pricing failures.
#[derive(Debug, Error)]
pub enum CarrierError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid carrier configuration.
    #[error("Invalid carrier configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Packing Errors
    // =========================================================================
    /// The cart could not be packed (oversize item, bad measures).
    #[error(transparent)]
    Pack(#[from] PackError),

    // =========================================================================
    // Pricing Errors
    // =========================================================================
    /// The logistics API answered with an alert instead of a price.
    #[error("Pricing service error: {message}")]
    PricingFailed { message: String },

    /// The logistics API returned an amount that is not a finite number.
    #[error("Pricing service returned an invalid {field}: {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    // =========================================================================
    // Command-Line Errors
    // =========================================================================
    /// Unknown flag, missing value, or a value that does not parse.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CarrierError {
    /// Builds a pricing failure from an API alert message.
    pub fn pricing(message: impl Into<String>) -> Self {
        CarrierError::PricingFailed {
            message: message.into(),
        }
    }

    /// Returns true if the customer's cart caused this (not the setup).
    pub fn is_cart_problem(&self) -> bool {
        matches!(self, CarrierError::Pack(e) if e.is_oversize())
    }
}

impl From<toml::de::Error> for CarrierError {
    fn from(err: toml::de::Error) -> Self {
        CarrierError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CarrierError {
    fn from(err: toml::ser::Error) -> Self {
        CarrierError::ConfigSaveFailed(err.to_string())
    }
}
