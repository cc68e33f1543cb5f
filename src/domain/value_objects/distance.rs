//! # Distance
//!
//! Road distance and travel-time estimate between two locations.
//!
//! Mapping providers report meters; kilometres are derived exactly as
//! `meters / 1000` in decimal so tier bounds compare without float drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved road distance.
///
/// # Examples
///
/// ```
/// use rotacerta_quotes::domain::value_objects::distance::Distance;
/// use rust_decimal::Decimal;
///
/// let d = Distance::new(45_250, 3_600);
/// assert_eq!(d.km(), Decimal::new(45_250, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Distance {
    meters: u64,
    eta_seconds: u64,
}

impl Distance {
    /// Creates a distance from provider meters and seconds.
    #[must_use]
    pub const fn new(meters: u64, eta_seconds: u64) -> Self {
        Self {
            meters,
            eta_seconds,
        }
    }

    /// Returns the distance in meters.
    #[inline]
    #[must_use]
    pub const fn meters(&self) -> u64 {
        self.meters
    }

    /// Returns the distance in kilometres, exact.
    #[must_use]
    pub fn km(&self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.meters), 3).normalize()
    }

    /// Returns the provider's travel-time estimate in seconds.
    #[inline]
    #[must_use]
    pub const fn eta_seconds(&self) -> u64 {
        self.eta_seconds
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km", self.km())
    }
}
