//! # Shipping Request and Options
//!
//! Transient per-call values: what the user wants shipped and the priced
//! options offered for it.
//!
//! # Examples
//!
//! ```
//! use rotacerta_quotes::domain::entities::shipping::{PackageDimensions, ShippingRequest};
//!
//! let request = ShippingRequest::new(
//!     "01310-100",
//!     "04538-133",
//!     PackageDimensions::new(1.5, 20.0, 10.0, 30.0).unwrap(),
//! )
//! .unwrap();
//!
//! assert_eq!(request.origin(), "01310-100");
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical package measurements.
///
/// Weight is in kilograms, sides in centimetres. Every value is finite and
/// strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackageDimensions {
    weight: f64,
    width: f64,
    height: f64,
    length: f64,
}

impl PackageDimensions {
    /// Creates validated package dimensions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPackageDimension` naming the first value
    /// that is not a finite positive number.
    pub fn new(weight: f64, width: f64, height: f64, length: f64) -> DomainResult<Self> {
        for (field, value) in [
            ("weight", weight),
            ("width", width),
            ("height", height),
            ("length", length),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DomainError::InvalidPackageDimension { field });
            }
        }
        Ok(Self {
            weight,
            width,
            height,
            length,
        })
    }

    /// Weight in kilograms.
    #[inline]
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Width in centimetres.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height in centimetres.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Length in centimetres.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }
}

/// A request to quote one package between two postal codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingRequest {
    origin: String,
    destination: String,
    package: PackageDimensions,
}

impl ShippingRequest {
    /// Creates a validated request.
    ///
    /// Postal codes are trimmed; blank codes are rejected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPostalCode` if either code is blank.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        package: PackageDimensions,
    ) -> DomainResult<Self> {
        let origin = normalize_postal_code(origin.into(), "origin")?;
        let destination = normalize_postal_code(destination.into(), "destination")?;
        Ok(Self {
            origin,
            destination,
            package,
        })
    }

    /// Origin postal code.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Destination postal code.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Package measurements.
    #[inline]
    #[must_use]
    pub fn package(&self) -> &PackageDimensions {
        &self.package
    }
}

fn normalize_postal_code(code: String, which: &str) -> DomainResult<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidPostalCode(format!(
            "{} postal code must not be blank",
            which
        )));
    }
    Ok(trimmed.to_string())
}

/// One priced way to ship a package.
///
/// `delivery_time` uses the carrier provider's unit; local driver options
/// always report `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShippingOption {
    carrier: String,
    service: String,
    price: Money,
    delivery_time: u32,
}

impl ShippingOption {
    /// Creates a shipping option.
    #[must_use]
    pub fn new(
        carrier: impl Into<String>,
        service: impl Into<String>,
        price: Money,
        delivery_time: u32,
    ) -> Self {
        Self {
            carrier: carrier.into(),
            service: service.into(),
            price,
            delivery_time,
        }
    }

    /// Carrier display name.
    #[inline]
    #[must_use]
    pub fn carrier(&self) -> &str {
        &self.carrier
    }

    /// Service display name.
    #[inline]
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Quoted price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Delivery time in the provider's unit.
    #[inline]
    #[must_use]
    pub fn delivery_time(&self) -> u32 {
        self.delivery_time
    }
}

impl fmt::Display for ShippingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} @ {} ({})",
            self.carrier, self.service, self.price, self.delivery_time
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn package() -> PackageDimensions {
        PackageDimensions::new(1.0, 10.0, 10.0, 10.0).unwrap()
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        let err = PackageDimensions::new(0.0, 10.0, 10.0, 10.0).unwrap_err();
        assert_eq!(err.field(), Some("weight"));

        let err = PackageDimensions::new(1.0, 10.0, -1.0, 10.0).unwrap_err();
        assert_eq!(err.field(), Some("height"));
    }

    #[test]
    fn rejects_non_finite_dimensions() {
        let err = PackageDimensions::new(1.0, f64::NAN, 10.0, 10.0).unwrap_err();
        assert_eq!(err.field(), Some("width"));

        let err = PackageDimensions::new(1.0, 10.0, 10.0, f64::INFINITY).unwrap_err();
        assert_eq!(err.field(), Some("length"));
    }

    #[test]
    fn trims_postal_codes() {
        let req = ShippingRequest::new(" 01310-100 ", "04538-133\n", package()).unwrap();
        assert_eq!(req.origin(), "01310-100");
        assert_eq!(req.destination(), "04538-133");
    }

    #[test]
    fn rejects_blank_postal_codes() {
        let err = ShippingRequest::new("   ", "04538-133", package()).unwrap_err();
        assert!(err.to_string().contains("origin"));

        let err = ShippingRequest::new("01310-100", "", package()).unwrap_err();
        assert!(err.to_string().contains("destination"));
    }

    #[test]
    fn option_display() {
        let opt = ShippingOption::new("Correios", "SEDEX", Money::from_minor(2590), 3);
        assert_eq!(opt.to_string(), "Correios / SEDEX @ 25.90 (3)");
    }
}
