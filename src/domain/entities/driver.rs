//! # Trusted Drivers
//!
//! A user's own roster of delivery drivers, each priced by distance tiers.
//!
//! Tiers keep the order they were attached in. The system does not enforce
//! that one driver's tiers are gap-free or non-overlapping; matching simply
//! takes the first tier that contains the distance.
//!
//! # Examples
//!
//! ```
//! use rotacerta_quotes::domain::entities::driver::{PricingTier, TrustedDriver};
//! use rotacerta_quotes::domain::value_objects::{Money, UserId};
//! use rust_decimal::Decimal;
//!
//! let tier = PricingTier::new(Decimal::ZERO, Decimal::from(50), Money::from_minor(2000)).unwrap();
//! let driver = TrustedDriver::new(UserId::new_v4(), "Ana", "motorcycle").with_tier(tier);
//!
//! assert_eq!(driver.pricing_tiers().len(), 1);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{DriverId, Money, Timestamp, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An inclusive distance band with a flat price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricingTier {
    min_distance_km: Decimal,
    max_distance_km: Decimal,
    price: Money,
}

impl PricingTier {
    /// Creates a validated tier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPricingTier` if a bound is negative or
    /// `min > max`, and `DomainError::InvalidPrice` if the price is negative.
    pub fn new(min_distance_km: Decimal, max_distance_km: Decimal, price: Money) -> DomainResult<Self> {
        if min_distance_km.is_sign_negative() || max_distance_km.is_sign_negative() {
            return Err(DomainError::InvalidPricingTier(
                "distance bounds must not be negative".to_string(),
            ));
        }
        if min_distance_km > max_distance_km {
            return Err(DomainError::InvalidPricingTier(format!(
                "min {} exceeds max {}",
                min_distance_km, max_distance_km
            )));
        }
        if price < Money::ZERO {
            return Err(DomainError::InvalidPrice(price.to_string()));
        }
        Ok(Self::from_parts(min_distance_km, max_distance_km, price))
    }

    /// Creates a tier without validation (for reconstruction from storage).
    #[must_use]
    pub const fn from_parts(min_distance_km: Decimal, max_distance_km: Decimal, price: Money) -> Self {
        Self {
            min_distance_km,
            max_distance_km,
            price,
        }
    }

    /// Lower bound, inclusive.
    #[inline]
    #[must_use]
    pub fn min_distance_km(&self) -> Decimal {
        self.min_distance_km
    }

    /// Upper bound, inclusive.
    #[inline]
    #[must_use]
    pub fn max_distance_km(&self) -> Decimal {
        self.max_distance_km
    }

    /// Flat price for any distance in the band.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns true if `distance_km` lies within `[min, max]`.
    #[inline]
    #[must_use]
    pub fn contains(&self, distance_km: Decimal) -> bool {
        self.min_distance_km <= distance_km && distance_km <= self.max_distance_km
    }
}

/// A driver the user trusts for local deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedDriver {
    id: DriverId,
    owner: UserId,
    name: String,
    phone: Option<String>,
    vehicle_type: String,
    pricing_tiers: Vec<PricingTier>,
    created_at: Timestamp,
}

impl TrustedDriver {
    /// Creates a driver with no tiers.
    #[must_use]
    pub fn new(owner: UserId, name: impl Into<String>, vehicle_type: impl Into<String>) -> Self {
        Self {
            id: DriverId::new_v4(),
            owner,
            name: name.into(),
            phone: None,
            vehicle_type: vehicle_type.into(),
            pricing_tiers: Vec::new(),
            created_at: Timestamp::now(),
        }
    }

    /// Reconstructs a driver from storage.
    #[must_use]
    pub fn from_parts(
        id: DriverId,
        owner: UserId,
        name: String,
        phone: Option<String>,
        vehicle_type: String,
        pricing_tiers: Vec<PricingTier>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner,
            name,
            phone,
            vehicle_type,
            pricing_tiers,
            created_at,
        }
    }

    /// Sets the contact phone.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Appends a tier after the existing ones.
    #[must_use]
    pub fn with_tier(mut self, tier: PricingTier) -> Self {
        self.pricing_tiers.push(tier);
        self
    }

    /// Driver identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> DriverId {
        self.id
    }

    /// The user whose roster this driver belongs to.
    #[inline]
    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Display name, used as the carrier name of local options.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact phone.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Vehicle description.
    #[inline]
    #[must_use]
    pub fn vehicle_type(&self) -> &str {
        &self.vehicle_type
    }

    /// Tiers in attachment order.
    #[inline]
    #[must_use]
    pub fn pricing_tiers(&self) -> &[PricingTier] {
        &self.pricing_tiers
    }

    /// When the driver was added.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
