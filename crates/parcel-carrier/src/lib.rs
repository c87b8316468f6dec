//! # parcel-carrier: Carrier Layer for Parcel Quote
//!
//! Wraps the pure packer in everything a checkout needs to offer one
//! shipping method: carrier configuration, parcel limit resolution, the
//! supported destination list and the rate collection flow.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         parcel-carrier                                  │
//! │                                                                         │
//! │   ┌──────────────┐    ┌──────────────┐    ┌──────────────────────────┐ │
//! │   │    config    │───►│    rates     │───►│  PricingService (trait)  │ │
//! │   │ TOML + env   │    │ RateCollector│    │  implemented by the      │ │
//! │   │ limits, URLs │    │ RateOutcome  │    │  HTTP client elsewhere   │ │
//! │   └──────┬───────┘    └──────┬───────┘    └──────────────────────────┘ │
//! │          │                   │                                          │
//! │   ┌──────▼───────┐    ┌──────▼───────────────────────────────────────┐ │
//! │   │  countries   │    │              parcel-core::pack               │ │
//! │   └──────────────┘    └──────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Argument and input handling for the `pack` binary
//! - [`config`] - Carrier configuration and limit resolution
//! - [`countries`] - Supported destination countries
//! - [`rates`] - Rate collection and the pricing seam
//! - [`error`] - Carrier error types

pub mod cli;
pub mod config;
pub mod countries;
pub mod error;
pub mod rates;

pub use config::{
    CarrierConfig, CarrierSettings, FlatRateSettings, LimitSettings, StoreSettings,
    DEFAULT_MAX_VOLUME_IN3, DEFAULT_MAX_WEIGHT_LB,
};
pub use countries::{is_supported_country, SUPPORTED_COUNTRIES};
pub use error::{CarrierError, CarrierResult};
pub use rates::{
    amount_from_api, Address, BasketProduct, BasketQuote, CarrierErrorMessage, CartLine,
    Currency, PricingService, QuoteAddress, RateCollector, RateOutcome, RateRequest,
    ShipmentQuote, ShippingMethod, CARRIER_CODE,
};

use tracing_subscriber::EnvFilter;

/// Initializes tracing for command-line tools.
///
/// Logs go to stderr so stdout stays clean for JSON output.
/// Set `RUST_LOG` to override the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,parcel_core=debug,parcel_carrier=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Serializes tests that read or write `PARCEL_*` environment variables.
#[cfg(test)]
pub(crate) mod test_env {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    const VARS: &[&str] = &[
        "PARCEL_CARRIER_ACTIVE",
        "PARCEL_LIVE_ACCOUNT",
        "PARCEL_MAX_WEIGHT",
        "PARCEL_MAX_VOLUME",
        "PARCEL_WEIGHT_UNIT",
        "PARCEL_FLAT_RATE_CENTS",
    ];

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    /// Holds the lock; all carrier variables are cleared on entry and exit.
    pub struct EnvGuard {
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvGuard {
        pub fn set(&self, key: &str, value: &str) {
            std::env::set_var(key, value);
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            clear();
        }
    }

    pub fn guard() -> EnvGuard {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        clear();
        EnvGuard { _lock: lock }
    }

    fn clear() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }
}
