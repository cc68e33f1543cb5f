//! # Tier Pricing
//!
//! Picks a driver's price for a distance.
//!
//! Tiers are scanned in attachment order and the first band containing the
//! distance wins. They are never sorted, so when a driver's bands overlap
//! the earlier one takes precedence. No match means the driver does not
//! serve that distance.
//!
//! # Examples
//!
//! ```
//! use rotacerta_quotes::domain::entities::PricingTier;
//! use rotacerta_quotes::domain::services::tier_pricing::TierPricingMatcher;
//! use rotacerta_quotes::domain::value_objects::Money;
//! use rust_decimal::Decimal;
//!
//! let tiers = [
//!     PricingTier::new(Decimal::ZERO, Decimal::from(50), Money::from_minor(2000)).unwrap(),
//!     PricingTier::new(Decimal::from(51), Decimal::from(100), Money::from_minor(1500)).unwrap(),
//! ];
//!
//! assert_eq!(TierPricingMatcher::match_price(Decimal::from(45), &tiers), Some(Money::from_minor(2000)));
//! assert_eq!(TierPricingMatcher::match_price(Decimal::new(505, 1), &tiers), None);
//! ```

use crate::domain::entities::PricingTier;
use crate::domain::value_objects::Money;
use rust_decimal::Decimal;

/// First-match tier lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierPricingMatcher;

impl TierPricingMatcher {
    /// Returns the price of the first tier containing `distance_km`.
    #[must_use]
    pub fn match_price(distance_km: Decimal, tiers: &[PricingTier]) -> Option<Money> {
        tiers
            .iter()
            .find(|tier| tier.contains(distance_km))
            .map(PricingTier::price)
    }
}
