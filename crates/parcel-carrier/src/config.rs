//! # Carrier Configuration
//!
//! Configuration management for the carrier: switches, display strings,
//! parcel limits, flat rate and store units.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PARCEL_MAX_WEIGHT=30                                               │
//! │     PARCEL_WEIGHT_UNIT=kgs                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/parcelquote/carrier.toml (Linux)                         │
//! │     ~/Library/Application Support/com.parcel.parcelquote/carrier.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     61.73 lb / 61,023.7 in³ per parcel, carrier active                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # carrier.toml
//! [carrier]
//! active = true
//! name = "Zenda"
//! title = "Zenda"
//! show_method = true
//! specific_error_message = "This shipping method is currently unavailable."
//! live_account = false
//! allowed_countries = ["GB", "FR"]
//!
//! [limits]
//! max_weight = 30.0
//!
//! [flat_rate]
//! enabled = false
//! price_cents = 0
//!
//! [store]
//! weight_unit = "kgs"
//! country = "GB"
//! postcode = "SW1A 1AA"
//! ```

use parcel_core::{Money, ParcelLimits, WeightUnit};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::countries::is_supported_country;
use crate::error::{CarrierError, CarrierResult};

/// Default per-parcel weight cap, in pounds.
pub const DEFAULT_MAX_WEIGHT_LB: f64 = 61.73;

/// Default per-parcel volume cap, in cubic inches.
pub const DEFAULT_MAX_VOLUME_IN3: f64 = 61023.7;

const PRODUCTION_API_URL: &str = "https://prd-api.zenda.global/v1/";
const TEST_API_URL: &str = "https://uat2-api.zenda.global/v1/";

// =============================================================================
// Carrier Settings
// =============================================================================

/// Carrier switches and the strings shown at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierSettings {
    /// Whether the carrier offers rates at all.
    #[serde(default = "default_true")]
    pub active: bool,

    /// Method name, also the prefix of the method title.
    #[serde(default = "default_name")]
    pub name: String,

    /// Carrier title shown above the method.
    #[serde(default = "default_name")]
    pub title: String,

    /// Show an error row instead of hiding the carrier when quoting fails.
    #[serde(default = "default_true")]
    pub show_method: bool,

    /// Text of that error row.
    #[serde(default = "default_error_message")]
    pub specific_error_message: String,

    /// Use the production API instead of the test environment.
    #[serde(default)]
    pub live_account: bool,

    /// Destinations this store ships to. Empty means no restriction.
    #[serde(default)]
    pub allowed_countries: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_name() -> String {
    "Zenda".to_string()
}

fn default_error_message() -> String {
    "This shipping method is currently unavailable. \
     If you would like to ship using this shipping method, please contact us."
        .to_string()
}

impl Default for CarrierSettings {
    fn default() -> Self {
        CarrierSettings {
            active: true,
            name: default_name(),
            title: default_name(),
            show_method: true,
            specific_error_message: default_error_message(),
            live_account: false,
            allowed_countries: Vec::new(),
        }
    }
}

// =============================================================================
// Parcel Limit Settings
// =============================================================================

/// Optional overrides for the per-parcel caps, in store units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_volume: Option<f64>,
}

// =============================================================================
// Flat Rate Settings
// =============================================================================

/// A fixed shipping price that replaces per-parcel quotes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatRateSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub price_cents: i64,
}

impl FlatRateSettings {
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// Store facts the carrier needs: weight unit and ship-from address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub weight_unit: WeightUnit,

    /// ISO-2 origin country, used when the request carries none.
    #[serde(default = "default_store_country")]
    pub country: String,

    /// Origin postcode, used when the request carries none.
    #[serde(default)]
    pub postcode: String,
}

fn default_store_country() -> String {
    "GB".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            weight_unit: WeightUnit::default(),
            country: default_store_country(),
            postcode: String::new(),
        }
    }
}

// =============================================================================
// Main Carrier Configuration
// =============================================================================

/// Complete carrier configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarrierConfig {
    #[serde(default)]
    pub carrier: CarrierSettings,

    #[serde(default)]
    pub limits: LimitSettings,

    #[serde(default)]
    pub flat_rate: FlatRateSettings,

    #[serde(default)]
    pub store: StoreSettings,
}

impl CarrierConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (carrier.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CarrierResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading carrier config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load carrier config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CarrierResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CarrierError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Carrier config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CarrierResult<()> {
        if let Some(w) = self.limits.max_weight {
            if !(w.is_finite() && w > 0.0) {
                return Err(CarrierError::InvalidConfig(format!(
                    "limits.max_weight must be greater than 0, got {}",
                    w
                )));
            }
        }

        if let Some(v) = self.limits.max_volume {
            if !(v.is_finite() && v > 0.0) {
                return Err(CarrierError::InvalidConfig(format!(
                    "limits.max_volume must be greater than 0, got {}",
                    v
                )));
            }
        }

        if self.flat_rate.price_cents < 0 {
            return Err(CarrierError::InvalidConfig(
                "flat_rate.price_cents must not be negative".into(),
            ));
        }

        if let Some(code) = self
            .carrier
            .allowed_countries
            .iter()
            .find(|c| !is_supported_country(c))
        {
            return Err(CarrierError::InvalidConfig(format!(
                "Country '{}' is not served by the carrier",
                code
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(active) = std::env::var("PARCEL_CARRIER_ACTIVE") {
            match parse_flag(&active) {
                Some(flag) => self.carrier.active = flag,
                None => warn!(value = %active, "Ignoring PARCEL_CARRIER_ACTIVE"),
            }
        }

        if let Ok(live) = std::env::var("PARCEL_LIVE_ACCOUNT") {
            if let Some(flag) = parse_flag(&live) {
                debug!(live = flag, "Overriding API environment from environment");
                self.carrier.live_account = flag;
            }
        }

        if let Ok(weight) = std::env::var("PARCEL_MAX_WEIGHT") {
            match weight.parse::<f64>() {
                Ok(w) => self.limits.max_weight = Some(w),
                Err(_) => warn!(value = %weight, "Ignoring non-numeric PARCEL_MAX_WEIGHT"),
            }
        }

        if let Ok(volume) = std::env::var("PARCEL_MAX_VOLUME") {
            match volume.parse::<f64>() {
                Ok(v) => self.limits.max_volume = Some(v),
                Err(_) => warn!(value = %volume, "Ignoring non-numeric PARCEL_MAX_VOLUME"),
            }
        }

        if let Ok(unit) = std::env::var("PARCEL_WEIGHT_UNIT") {
            match unit.parse::<WeightUnit>() {
                Ok(parsed) => {
                    debug!(unit = %parsed, "Overriding weight unit from environment");
                    self.store.weight_unit = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring PARCEL_WEIGHT_UNIT"),
            }
        }

        if let Ok(cents) = std::env::var("PARCEL_FLAT_RATE_CENTS") {
            match cents.parse::<i64>() {
                Ok(c) => {
                    self.flat_rate.enabled = true;
                    self.flat_rate.price_cents = c;
                }
                Err(_) => warn!(value = %cents, "Ignoring non-numeric PARCEL_FLAT_RATE_CENTS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "parcel", "parcelquote")
            .map(|dirs| dirs.config_dir().join("carrier.toml"))
    }

    // =========================================================================
    // Parcel Limits
    // =========================================================================

    /// Resolves the per-parcel caps the packer should use.
    ///
    /// ## Resolution
    /// ```text
    /// limits.max_weight set? ──yes──► use as-is (store unit)
    ///        │ no
    ///        ▼
    /// 61.73 lb ──► store in kgs? ──yes──► × 0.4536
    ///
    /// limits.max_volume set? ──yes──► use as-is
    ///        │ no
    ///        ▼
    /// 61,023.7 in³
    /// ```
    pub fn parcel_limits(&self) -> CarrierResult<ParcelLimits> {
        let max_weight = self
            .limits
            .max_weight
            .unwrap_or_else(|| self.store.weight_unit.convert_pounds(DEFAULT_MAX_WEIGHT_LB));
        let max_volume = self.limits.max_volume.unwrap_or(DEFAULT_MAX_VOLUME_IN3);

        ParcelLimits::new(max_weight, max_volume)
            .map_err(|e| CarrierError::InvalidConfig(e.to_string()))
    }

    // =========================================================================
    // API Endpoints
    // =========================================================================

    /// Base URL of the logistics API for the configured environment.
    pub fn api_base_url(&self) -> &'static str {
        if self.carrier.live_account {
            PRODUCTION_API_URL
        } else {
            TEST_API_URL
        }
    }

    /// Token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}token", self.api_base_url())
    }

    /// Per-parcel shipping cost endpoint (no tax or duty).
    pub fn shipping_cost_url(&self) -> String {
        format!("{}quotes/shipments", self.api_base_url())
    }

    /// Whole-cart tax and duty endpoint.
    pub fn tax_and_duty_url(&self) -> String {
        format!("{}quotes/baskets", self.api_base_url())
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns true when rates should be collected.
    pub fn is_active(&self) -> bool {
        self.carrier.active
    }

    /// Returns true if the carrier may ship to `country`.
    pub fn ships_to(&self, country: &str) -> bool {
        let allowed = &self.carrier.allowed_countries;
        allowed.is_empty() || allowed.iter().any(|c| c.eq_ignore_ascii_case(country.trim()))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
