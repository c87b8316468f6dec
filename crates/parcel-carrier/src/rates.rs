//! # Rate Collection
//!
//! Turns a rate request into a shipping method by packing the cart,
//! pricing every parcel, and adding tax and duty for the whole cart.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      collect_rates(request)                             │
//! │                                                                         │
//! │  carrier inactive? ───────────────────────────────► Unavailable         │
//! │  destination not allowed? ────────────────────────► Unavailable         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  shipping price                                                         │
//! │    flat rate enabled ──► configured price                               │
//! │    otherwise ──► limits ──► pack ──► Σ PricingService::shipping_price   │
//! │        │                               (one call per parcel, in order)  │
//! │        ▼                                                                │
//! │  PricingService::tax_and_duty (one call, whole cart)                    │
//! │        │                                                                │
//! │        ├── any error ──► show_method? ──yes──► Error(message)           │
//! │        │                              └─no───► Suppressed               │
//! │        ├── shipping > 0 ──► Method(shipping + tax and duty)             │
//! │        └── otherwise ─────► NoRate                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The HTTP client and token exchange sit behind [`PricingService`] and
//! live outside this crate.

use async_trait::async_trait;
use parcel_core::{pack, Dimensions, Item, Money, Parcel, ProductType, QUOTED_VOLUME_UNIT};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::CarrierConfig;
use crate::error::{CarrierError, CarrierResult};

/// Code the carrier registers its single method under.
pub const CARRIER_CODE: &str = "zenda";

/// Destination assumed when the request has no country yet.
pub const DEFAULT_DESTINATION_COUNTRY: &str = "US";

// =============================================================================
// Request Types
// =============================================================================

/// One cart line as handed over by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub product_type: ProductType,
    /// Weight of one unit, in the store weight unit.
    pub weight: f64,
    #[serde(default)]
    pub dimensions: Dimensions,
    pub quantity: u32,
    /// Unit price.
    pub price: Money,
}

impl CartLine {
    /// The packer's view of this line.
    pub fn to_item(&self) -> Item {
        Item::with_dimensions(
            self.weight,
            self.dimensions,
            self.quantity,
            self.product_type.clone(),
        )
    }
}

/// A partially known address; blanks fall back to configured values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub country: Option<String>,
    pub postcode: Option<String>,
}

/// Cart currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code, e.g. `GBP`.
    pub code: String,
    /// Display symbol, e.g. `£`.
    pub symbol: String,
}

/// Everything needed to quote one cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRequest {
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub origin: Address,
    #[serde(default)]
    pub destination: Address,
    pub currency: Currency,
    /// Total value of the cart.
    pub package_value: Money,
}

// =============================================================================
// Pricing Service Payloads
// =============================================================================

/// A resolved address as sent to the logistics API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAddress {
    pub postal_code: String,
    pub country_code: String,
}

/// One measurement of a parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub metric_type: &'static str,
    pub metric_value: f64,
    pub metric_unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelMetrics {
    pub metrics: Vec<Metric>,
}

/// Body of one per-parcel shipping price request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentQuote {
    pub service_level: String,
    pub origin: QuoteAddress,
    pub destination: QuoteAddress,
    pub currency_code: String,
    pub parcel: ParcelMetrics,
}

impl ShipmentQuote {
    /// Weight metric value, for services that need it without walking metrics.
    pub fn weight(&self) -> f64 {
        self.metric("WEIGHT")
    }

    /// Volume metric value.
    pub fn volume(&self) -> f64 {
        self.metric("VOLUME")
    }

    fn metric(&self, kind: &str) -> f64 {
        self.parcel
            .metrics
            .iter()
            .find(|m| m.metric_type == kind)
            .map(|m| m.metric_value)
            .unwrap_or_default()
    }
}

/// A cart line in the tax and duty request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasketProduct {
    #[serde(rename = "SKUCode")]
    pub sku_code: String,
    pub description: String,
    pub value: f64,
    pub qty: u32,
}

/// Body of the whole-cart tax and duty request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketQuote {
    pub source_country: String,
    pub shipping_price: f64,
    pub destination_country: String,
    pub current_cart_value: f64,
    pub cart_currency_code: String,
    pub products: Vec<BasketProduct>,
}

// =============================================================================
// Pricing Service
// =============================================================================

/// Remote pricing operations the rate collector depends on.
///
/// Implementations own transport, authentication and response parsing.
/// An API alert must come back as [`CarrierError::PricingFailed`]; decimal
/// amounts should go through [`amount_from_api`].
#[async_trait]
pub trait PricingService: Send + Sync {
    /// Shipping cost of one parcel, without tax or duty.
    async fn shipping_price(&self, quote: &ShipmentQuote) -> CarrierResult<Money>;

    /// Total tax plus duty for the whole cart.
    async fn tax_and_duty(&self, quote: &BasketQuote) -> CarrierResult<Money>;
}

/// Converts a decimal amount from an API response into money.
pub fn amount_from_api(field: &'static str, value: f64) -> CarrierResult<Money> {
    if !value.is_finite() {
        return Err(CarrierError::InvalidAmount { field, value });
    }
    Ok(Money::from_decimal(value))
}

// =============================================================================
// Outcomes
// =============================================================================

/// The priced shipping method offered at checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    pub carrier: String,
    pub carrier_title: String,
    pub method: String,
    pub method_title: String,
    /// Shipping plus tax and duty.
    pub price: Money,
    pub cost: Money,
    pub shipping: Money,
    pub tax_and_duty: Money,
}

/// The error row shown instead of a method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierErrorMessage {
    pub carrier: String,
    pub carrier_title: String,
    pub message: String,
}

/// What the carrier contributes to the checkout's shipping options.
#[derive(Debug, Clone, PartialEq)]
pub enum RateOutcome {
    /// Carrier disabled or destination not served.
    Unavailable,
    /// Quoting succeeded but shipping came out at zero.
    NoRate,
    /// A priced method.
    Method(ShippingMethod),
    /// Quoting failed and the carrier is configured to say so.
    Error(CarrierErrorMessage),
    /// Quoting failed and the carrier is configured to stay silent.
    Suppressed,
}

// =============================================================================
// Rate Collector
// =============================================================================

/// Collects the carrier's rate for a cart.
pub struct RateCollector<P> {
    config: CarrierConfig,
    pricing: P,
}

impl<P: PricingService> RateCollector<P> {
    pub fn new(config: CarrierConfig, pricing: P) -> Self {
        RateCollector { config, pricing }
    }

    pub fn config(&self) -> &CarrierConfig {
        &self.config
    }

    /// Runs the whole quote for one request.
    pub async fn collect_rates(&self, request: &RateRequest) -> RateOutcome {
        if !self.config.is_active() {
            debug!("Carrier inactive, skipping rate collection");
            return RateOutcome::Unavailable;
        }

        let origin = self.origin(request);
        let destination = self.destination(request);

        if !self.config.ships_to(&destination.country_code) {
            debug!(country = %destination.country_code, "Destination not served");
            return RateOutcome::Unavailable;
        }

        match self.quote(request, &origin, &destination).await {
            Ok((shipping, tax_and_duty)) if shipping.is_positive() => {
                info!(%shipping, %tax_and_duty, "Rate collected");
                RateOutcome::Method(self.method(request, shipping, tax_and_duty))
            }
            Ok(_) => {
                debug!("Shipping price is zero, no rate offered");
                RateOutcome::NoRate
            }
            Err(e) => {
                if e.is_cart_problem() {
                    warn!(error = %e, "Cart cannot be shipped");
                } else {
                    error!(error = %e, "Rate collection failed");
                }
                self.error_outcome()
            }
        }
    }

    async fn quote(
        &self,
        request: &RateRequest,
        origin: &QuoteAddress,
        destination: &QuoteAddress,
    ) -> CarrierResult<(Money, Money)> {
        let shipping = self.shipping_price(request, origin, destination).await?;
        let tax_and_duty = self
            .tax_and_duty(request, shipping, origin, destination)
            .await?;
        Ok((shipping, tax_and_duty))
    }

    /// Packs the request's cart with the configured limits.
    pub fn plan_parcels(&self, request: &RateRequest) -> CarrierResult<Vec<Parcel>> {
        let limits = self.config.parcel_limits()?;
        let items: Vec<Item> = request.lines.iter().map(CartLine::to_item).collect();
        let parcels = pack(&items, limits)?;

        debug!(
            lines = request.lines.len(),
            parcels = parcels.len(),
            max_weight = limits.max_weight(),
            max_volume = limits.max_volume(),
            "Cart packed"
        );
        Ok(parcels)
    }

    /// Total shipping for all parcels, or the flat rate.
    pub async fn shipping_price(
        &self,
        request: &RateRequest,
        origin: &QuoteAddress,
        destination: &QuoteAddress,
    ) -> CarrierResult<Money> {
        if self.config.flat_rate.enabled {
            return Ok(self.config.flat_rate.price());
        }

        let parcels = self.plan_parcels(request)?;
        let mut total = Money::zero();

        // One call at a time, in parcel order.
        for (index, parcel) in parcels.iter().enumerate() {
            let quote = self.shipment_quote(parcel, &request.currency, origin, destination);
            let price = self.pricing.shipping_price(&quote).await?;
            debug!(parcel = index, %price, "Parcel priced");
            total += price;
        }

        Ok(total)
    }

    async fn tax_and_duty(
        &self,
        request: &RateRequest,
        shipping: Money,
        origin: &QuoteAddress,
        destination: &QuoteAddress,
    ) -> CarrierResult<Money> {
        let quote = BasketQuote {
            source_country: origin.country_code.clone(),
            shipping_price: shipping.to_decimal(),
            destination_country: destination.country_code.clone(),
            current_cart_value: request.package_value.to_decimal(),
            cart_currency_code: request.currency.code.clone(),
            products: request
                .lines
                .iter()
                .map(|line| BasketProduct {
                    sku_code: line.sku.clone(),
                    description: line.name.clone(),
                    value: line.price.to_decimal(),
                    qty: line.quantity,
                })
                .collect(),
        };

        self.pricing.tax_and_duty(&quote).await
    }

    fn shipment_quote(
        &self,
        parcel: &Parcel,
        currency: &Currency,
        origin: &QuoteAddress,
        destination: &QuoteAddress,
    ) -> ShipmentQuote {
        ShipmentQuote {
            service_level: String::new(),
            origin: origin.clone(),
            destination: destination.clone(),
            currency_code: currency.code.clone(),
            parcel: ParcelMetrics {
                metrics: vec![
                    Metric {
                        metric_type: "WEIGHT",
                        metric_value: parcel.weight,
                        metric_unit: self.config.store.weight_unit.wire_code(),
                    },
                    Metric {
                        metric_type: "VOLUME",
                        metric_value: parcel.volume,
                        metric_unit: QUOTED_VOLUME_UNIT,
                    },
                ],
            },
        }
    }

    fn origin(&self, request: &RateRequest) -> QuoteAddress {
        QuoteAddress {
            country_code: non_blank(&request.origin.country)
                .unwrap_or(self.config.store.country.as_str())
                .to_uppercase(),
            postal_code: non_blank(&request.origin.postcode)
                .unwrap_or(self.config.store.postcode.as_str())
                .to_string(),
        }
    }

    fn destination(&self, request: &RateRequest) -> QuoteAddress {
        QuoteAddress {
            country_code: non_blank(&request.destination.country)
                .unwrap_or(DEFAULT_DESTINATION_COUNTRY)
                .to_uppercase(),
            postal_code: non_blank(&request.destination.postcode)
                .unwrap_or_default()
                .to_string(),
        }
    }

    fn method(&self, request: &RateRequest, shipping: Money, tax_and_duty: Money) -> ShippingMethod {
        let carrier = &self.config.carrier;
        let symbol = &request.currency.symbol;
        let total = shipping + tax_and_duty;

        ShippingMethod {
            carrier: CARRIER_CODE.to_string(),
            carrier_title: carrier.title.clone(),
            method: CARRIER_CODE.to_string(),
            method_title: format!(
                "{} ({} shipping + {} prepaid tax and duty)",
                carrier.name,
                shipping.with_symbol(symbol),
                tax_and_duty.with_symbol(symbol)
            ),
            price: total,
            cost: total,
            shipping,
            tax_and_duty,
        }
    }

    fn error_outcome(&self) -> RateOutcome {
        let carrier = &self.config.carrier;
        if !carrier.show_method {
            return RateOutcome::Suppressed;
        }

        RateOutcome::Error(CarrierErrorMessage {
            carrier: CARRIER_CODE.to_string(),
            carrier_title: carrier.title.clone(),
            message: carrier.specific_error_message.clone(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_core::WeightUnit;
    use std::sync::Mutex;

    /// Prices each parcel at one currency unit per weight unit.
    #[derive(Default)]
    struct FakePricing {
        shipments: Mutex<Vec<ShipmentQuote>>,
        baskets: Mutex<Vec<BasketQuote>>,
        fail_shipping: Option<String>,
        tax_and_duty: Money,
    }

    #[async_trait]
    impl PricingService for FakePricing {
        async fn shipping_price(&self, quote: &ShipmentQuote) -> CarrierResult<Money> {
            self.shipments.lock().unwrap().push(quote.clone());
            if let Some(msg) = &self.fail_shipping {
                return Err(CarrierError::pricing(msg.clone()));
            }
            amount_from_api("cost", quote.weight())
        }

        async fn tax_and_duty(&self, quote: &BasketQuote) -> CarrierResult<Money> {
            self.baskets.lock().unwrap().push(quote.clone());
            Ok(self.tax_and_duty)
        }
    }

    fn line(sku: &str, weight: f64, quantity: u32) -> CartLine {
        CartLine {
            sku: sku.to_string(),
            name: format!("Product {}", sku),
            product_type: ProductType::Simple,
            weight,
            dimensions: Dimensions::new(2.0, 2.0, 2.0),
            quantity,
            price: Money::from_cents(1000),
        }
    }

    fn request(lines: Vec<CartLine>) -> RateRequest {
        RateRequest {
            lines,
            origin: Address::default(),
            destination: Address {
                country: Some("fr".to_string()),
                postcode: Some("75001".to_string()),
            },
            currency: Currency {
                code: "GBP".to_string(),
                symbol: "£".to_string(),
            },
            package_value: Money::from_cents(5000),
        }
    }

    fn config_with_limits(max_weight: f64, max_volume: f64) -> CarrierConfig {
        let mut config = CarrierConfig::default();
        config.limits.max_weight = Some(max_weight);
        config.limits.max_volume = Some(max_volume);
        config.store.postcode = "SW1A 1AA".to_string();
        config
    }

    #[tokio::test]
    async fn test_one_price_call_per_parcel_and_sum() {
        let pricing = FakePricing {
            tax_and_duty: Money::from_cents(350),
            ..Default::default()
        };
        let collector = RateCollector::new(config_with_limits(20.0, 1000.0), pricing);

        // Units: 10, 10, 8 → parcels {20}, {8}
        let req = request(vec![line("A", 10.0, 2), line("B", 8.0, 1)]);
        let outcome = collector.collect_rates(&req).await;

        let RateOutcome::Method(method) = &outcome else {
            panic!("expected a method, got {:?}", outcome);
        };
        assert_eq!(method.shipping.cents(), 2800);
        assert_eq!(method.tax_and_duty.cents(), 350);
        assert_eq!(method.price.cents(), 3150);
        assert_eq!(method.cost, method.price);
        assert_eq!(
            method.method_title,
            "Zenda (£28.00 shipping + £3.50 prepaid tax and duty)"
        );

        let shipments = collector.pricing.shipments.lock().unwrap();
        assert_eq!(shipments.len(), 2);
        assert_eq!(shipments[0].weight(), 20.0);
        assert_eq!(shipments[0].volume(), 16.0);
        assert_eq!(shipments[1].weight(), 8.0);
        assert_eq!(shipments[0].origin.country_code, "GB");
        assert_eq!(shipments[0].origin.postal_code, "SW1A 1AA");
        assert_eq!(shipments[0].destination.country_code, "FR");
        assert_eq!(shipments[0].parcel.metrics[0].metric_unit, "LB");
        assert_eq!(shipments[0].parcel.metrics[1].metric_unit, "IN3");

        let baskets = collector.pricing.baskets.lock().unwrap();
        assert_eq!(baskets.len(), 1);
        assert_eq!(baskets[0].shipping_price, 28.0);
        assert_eq!(baskets[0].products.len(), 2);
        assert_eq!(baskets[0].current_cart_value, 50.0);
    }

    #[tokio::test]
    async fn test_metric_store_sends_kilograms() {
        let mut config = config_with_limits(20.0, 1000.0);
        config.store.weight_unit = WeightUnit::Kilograms;
        let collector = RateCollector::new(config, FakePricing::default());

        collector.collect_rates(&request(vec![line("A", 3.0, 1)])).await;

        let shipments = collector.pricing.shipments.lock().unwrap();
        assert_eq!(shipments[0].parcel.metrics[0].metric_unit, "KG");
    }

    #[tokio::test]
    async fn test_flat_rate_skips_parcel_pricing() {
        let mut config = CarrierConfig::default();
        config.flat_rate.enabled = true;
        config.flat_rate.price_cents = 995;
        let collector = RateCollector::new(config, FakePricing::default());

        let outcome = collector
            .collect_rates(&request(vec![line("A", 1.0, 1)]))
            .await;

        assert!(matches!(outcome, RateOutcome::Method(ref m) if m.shipping.cents() == 995));
        assert!(collector.pricing.shipments.lock().unwrap().is_empty());
        assert_eq!(collector.pricing.baskets.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_oversize_cart_shows_error_row() {
        let collector = RateCollector::new(config_with_limits(20.0, 1000.0), FakePricing::default());

        let outcome = collector
            .collect_rates(&request(vec![line("A", 1.0, 1), line("HEAVY", 25.0, 1)]))
            .await;

        let RateOutcome::Error(msg) = &outcome else {
            panic!("expected an error row, got {:?}", outcome);
        };
        assert_eq!(msg.carrier, CARRIER_CODE);
        assert!(msg.message.starts_with("This shipping method is currently unavailable"));
        assert!(collector.pricing.shipments.lock().unwrap().is_empty());
        assert!(collector.pricing.baskets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pricing_failure_is_suppressed_when_configured() {
        let mut config = config_with_limits(20.0, 1000.0);
        config.carrier.show_method = false;
        let pricing = FakePricing {
            fail_shipping: Some("Invalid postal code".to_string()),
            ..Default::default()
        };
        let collector = RateCollector::new(config, pricing);

        let outcome = collector
            .collect_rates(&request(vec![line("A", 1.0, 3)]))
            .await;
        assert_eq!(outcome, RateOutcome::Suppressed);
    }

    #[tokio::test]
    async fn test_zero_shipping_offers_no_rate() {
        let collector = RateCollector::new(config_with_limits(20.0, 1000.0), FakePricing::default());

        // Only a configurable parent: nothing to pack, nothing to price.
        let mut parent = line("PARENT", 5.0, 1);
        parent.product_type = ProductType::Configurable;

        let outcome = collector.collect_rates(&request(vec![parent])).await;
        assert_eq!(outcome, RateOutcome::NoRate);
    }

    #[tokio::test]
    async fn test_inactive_and_unserved_destinations() {
        let mut config = CarrierConfig::default();
        config.carrier.active = false;
        let collector = RateCollector::new(config, FakePricing::default());
        let outcome = collector.collect_rates(&request(vec![line("A", 1.0, 1)])).await;
        assert_eq!(outcome, RateOutcome::Unavailable);

        let mut config = CarrierConfig::default();
        config.carrier.allowed_countries = vec!["GB".to_string()];
        let collector = RateCollector::new(config, FakePricing::default());
        let outcome = collector.collect_rates(&request(vec![line("A", 1.0, 1)])).await;
        assert_eq!(outcome, RateOutcome::Unavailable);
    }

    #[test]
    fn test_destination_falls_back_to_default_country() {
        let collector = RateCollector::new(CarrierConfig::default(), FakePricing::default());
        let mut req = request(vec![]);
        req.destination = Address {
            country: Some("  ".to_string()),
            postcode: None,
        };

        let dest = collector.destination(&req);
        assert_eq!(dest.country_code, DEFAULT_DESTINATION_COUNTRY);
        assert_eq!(dest.postal_code, "");
    }

    #[test]
    fn test_amount_from_api_rejects_non_finite() {
        assert_eq!(amount_from_api("cost", 12.5).unwrap().cents(), 1250);
        assert!(matches!(
            amount_from_api("cost", f64::NAN),
            Err(CarrierError::InvalidAmount { field: "cost", .. })
        ));
    }

    #[test]
    fn test_shipment_quote_wire_shape() {
        let collector = RateCollector::new(CarrierConfig::default(), FakePricing::default());
        let parcel = Parcel {
            weight: 4.5,
            volume: 100.0,
            unit_count: 2,
        };
        let addr = QuoteAddress {
            postal_code: "1010".to_string(),
            country_code: "AT".to_string(),
        };
        let currency = Currency {
            code: "EUR".to_string(),
            symbol: "€".to_string(),
        };

        let quote = collector.shipment_quote(&parcel, &currency, &addr, &addr);
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["serviceLevel"], "");
        assert_eq!(json["currencyCode"], "EUR");
        assert_eq!(json["origin"]["countryCode"], "AT");
        assert_eq!(json["parcel"]["metrics"][0]["metricType"], "WEIGHT");
        assert_eq!(json["parcel"]["metrics"][1]["metricValue"], 100.0);
    }
}
