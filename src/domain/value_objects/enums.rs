//! # Domain Enums
//!
//! - [`SubscriptionStatus`] - Billing state of a user's subscription
//!
//! Enums implement `Display`, `FromStr`, and Serde traits using the
//! same SCREAMING_SNAKE_CASE spelling that is stored in the database.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Billing state of a subscription.
///
/// Only [`SubscriptionStatus::Active`] grants access to quoting.
///
/// # Examples
///
/// ```
/// use rotacerta_quotes::domain::value_objects::enums::SubscriptionStatus;
///
/// let status: SubscriptionStatus = "past_due".parse().unwrap();
/// assert_eq!(status, SubscriptionStatus::PastDue);
/// assert!(!status.is_active());
/// assert_eq!(status.to_string(), "PAST_DUE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    /// Paid and current.
    Active,
    /// Cancelled by the user or the billing provider.
    Canceled,
    /// Payment overdue.
    PastDue,
    /// Never activated.
    Inactive,
}

impl SubscriptionStatus {
    /// Returns true if this status grants quoting access.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns the stored spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Canceled => "CANCELED",
            Self::PastDue => "PAST_DUE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "ACTIVE" => Ok(Self::Active),
            "CANCELED" | "CANCELLED" => Ok(Self::Canceled),
            "PAST_DUE" | "PASTDUE" => Ok(Self::PastDue),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(ParseEnumError::InvalidValue(
                "SubscriptionStatus",
                s.to_string(),
            )),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
