//! # Quota Policy
//!
//! Pure admission rule for quoting. The async guard in the application
//! layer loads the state and delegates here.
//!
//! Rules are checked in order:
//!
//! 1. No principal: [`QuotaDenial::NotAuthenticated`]
//! 2. No subscription, status not `ACTIVE`, or period end not strictly after
//!    now: [`QuotaDenial::NoActiveSubscription`]
//! 3. Limit set and `quote_count >= quote_limit`: [`QuotaDenial::QuotaExceeded`]

use crate::domain::entities::QuotaState;
use crate::domain::value_objects::{Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why quoting was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuotaDenial {
    /// No authenticated user.
    NotAuthenticated,
    /// Missing, inactive or expired subscription.
    NoActiveSubscription,
    /// Plan limit reached.
    QuotaExceeded,
}

impl QuotaDenial {
    /// Stable machine-readable reason code.
    #[must_use]
    pub const fn reason_code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NotAuthenticated",
            Self::NoActiveSubscription => "NoActiveSubscription",
            Self::QuotaExceeded => "QuotaExceeded",
        }
    }

    /// Human-readable message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "authentication required",
            Self::NoActiveSubscription => "no active subscription",
            Self::QuotaExceeded => "quote limit reached for the current plan",
        }
    }
}

impl fmt::Display for QuotaDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of a quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The user may quote.
    Allow(UserId),
    /// The user may not quote.
    Deny(QuotaDenial),
}

impl QuotaDecision {
    /// Returns true if quoting is allowed.
    #[inline]
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Evaluates the admission rule.
///
/// `state` is the subscription of `principal`, or `None` if the user has none.
#[must_use]
pub fn evaluate(
    principal: Option<UserId>,
    state: Option<&QuotaState>,
    now: Timestamp,
) -> QuotaDecision {
    let Some(user_id) = principal else {
        return QuotaDecision::Deny(QuotaDenial::NotAuthenticated);
    };
    let Some(state) = state else {
        return QuotaDecision::Deny(QuotaDenial::NoActiveSubscription);
    };
    if !state.is_current(now) {
        return QuotaDecision::Deny(QuotaDenial::NoActiveSubscription);
    }
    if state.is_exhausted() {
        return QuotaDecision::Deny(QuotaDenial::QuotaExceeded);
    }
    QuotaDecision::Allow(user_id)
}
