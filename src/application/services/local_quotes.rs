//! # Local Driver Quotes
//!
//! Prices a request against the user's trusted drivers.
//!
//! The road distance is resolved once, then every driver in roster order
//! contributes at most one option from the first tier containing that
//! distance. Beyond the service radius no local option is offered. A
//! distance that cannot be resolved degrades to no local options; this
//! engine never fails.

use crate::domain::entities::{ShippingOption, ShippingRequest, TrustedDriver};
use crate::domain::services::TierPricingMatcher;
use crate::infrastructure::providers::{DistanceError, DistanceResolver};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Default service radius in kilometres.
pub const DEFAULT_MAX_LOCAL_DISTANCE_KM: i64 = 100;

/// Default service label on local options.
pub const DEFAULT_LOCAL_SERVICE_NAME: &str = "Local Delivery";

/// Configuration for local quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalQuoteConfig {
    /// Distances strictly above this get no local options.
    pub max_distance_km: Decimal,
    /// `service` field on emitted options.
    pub service_name: String,
}

impl Default for LocalQuoteConfig {
    fn default() -> Self {
        Self {
            max_distance_km: Decimal::from(DEFAULT_MAX_LOCAL_DISTANCE_KM),
            service_name: DEFAULT_LOCAL_SERVICE_NAME.to_string(),
        }
    }
}

impl LocalQuoteConfig {
    /// Sets the service radius.
    #[must_use]
    pub fn with_max_distance_km(mut self, km: Decimal) -> Self {
        self.max_distance_km = km;
        self
    }

    /// Sets the service label.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }
}

/// Distance-tier quote engine over a driver roster.
#[derive(Debug, Clone)]
pub struct LocalDriverQuoteEngine {
    distance: Arc<dyn DistanceResolver>,
    config: LocalQuoteConfig,
}

impl LocalDriverQuoteEngine {
    /// Creates an engine.
    #[must_use]
    pub fn new(distance: Arc<dyn DistanceResolver>, config: LocalQuoteConfig) -> Self {
        Self { distance, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LocalQuoteConfig {
        &self.config
    }

    /// Quotes every driver in `roster` for `request`.
    pub async fn quote(
        &self,
        request: &ShippingRequest,
        roster: &[TrustedDriver],
    ) -> Vec<ShippingOption> {
        let distance = match self
            .distance
            .resolve(request.origin(), request.destination())
            .await
        {
            Ok(distance) => distance,
            Err(e @ DistanceError::Transient(_)) if !e.is_retryable() => {
                error!(
                    kind = e.kind(),
                    error = %e,
                    "distance provider rejected the request, skipping local options"
                );
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    origin = request.origin(),
                    destination = request.destination(),
                    kind = e.kind(),
                    error = %e,
                    "distance unresolved, skipping local options"
                );
                return Vec::new();
            }
        };

        debug!(km = %distance.km(), eta_seconds = distance.eta_seconds(), "distance resolved");
        self.options_for_distance(distance.km(), roster)
    }

    /// Applies the radius cutoff and tier matching for a known distance.
    #[must_use]
    pub fn options_for_distance(
        &self,
        distance_km: Decimal,
        roster: &[TrustedDriver],
    ) -> Vec<ShippingOption> {
        if distance_km > self.config.max_distance_km {
            info!(
                km = %distance_km,
                max_km = %self.config.max_distance_km,
                "beyond local delivery radius"
            );
            return Vec::new();
        }

        roster
            .iter()
            .filter_map(|driver| {
                TierPricingMatcher::match_price(distance_km, driver.pricing_tiers()).map(|price| {
                    ShippingOption::new(driver.name(), self.config.service_name.as_str(), price, 0)
                })
            })
            .collect()
    }
}
