//! # Domain Errors
//!
//! Validation failures raised while constructing domain values.

use thiserror::Error;

/// Error raised when a domain invariant is violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A postal code was blank.
    #[error("invalid postal code: {0}")]
    InvalidPostalCode(String),

    /// A package dimension was missing, non-finite, or not positive.
    #[error("invalid package dimension: {field} must be a positive number")]
    InvalidPackageDimension {
        /// Offending field name.
        field: &'static str,
    },

    /// A pricing tier had `min > max` or a negative bound.
    #[error("invalid pricing tier: {0}")]
    InvalidPricingTier(String),

    /// A price was negative or out of range.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// A persisted payload could not be decoded.
    #[error("invalid record payload: {0}")]
    InvalidPayload(String),
}

impl DomainError {
    /// Returns the field name for dimension errors.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidPackageDimension { field } => Some(field),
            _ => None,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
