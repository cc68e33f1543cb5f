//! # Money
//!
//! Integer minor-unit amounts.
//!
//! All prices in the system share one currency. Amounts are stored as a
//! count of minor units (cents) so sums and comparisons never drift; the
//! decimal form only appears at the edges (provider payloads, HTTP bodies).
//!
//! # Examples
//!
//! ```
//! use rotacerta_quotes::domain::value_objects::money::Money;
//! use rust_decimal::Decimal;
//!
//! let price = Money::from_decimal(Decimal::new(2050, 2)).unwrap();
//! assert_eq!(price.minor_units(), 2050);
//! assert_eq!(price.to_string(), "20.50");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for money conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MoneyError {
    /// Amount does not fit in `i64` minor units.
    #[error("amount overflow")]
    Overflow,
}

/// Result type for money conversions.
pub type MoneyResult<T> = Result<T, MoneyError>;

/// Number of decimal places of the minor unit.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// An amount of money in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Converts a decimal amount in major units, rounding half to even at
    /// the minor unit.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the amount does not fit in `i64`
    /// minor units.
    pub fn from_decimal(amount: Decimal) -> MoneyResult<Self> {
        let scaled = amount
            .round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointNearestEven)
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(MoneyError::Overflow)?;
        scaled.to_i64().map(Self).ok_or(MoneyError::Overflow)
    }

    /// Returns the amount in minor units.
    #[inline]
    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the amount as a decimal in major units.
    #[must_use]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MINOR_UNIT_SCALE)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
