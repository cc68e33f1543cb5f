//! # Subscription Quota State
//!
//! The slice of a user's subscription and plan that gates quoting.

use crate::domain::value_objects::{Money, SubscriptionStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// Name of the seeded free plan.
pub const FREE_PLAN_NAME: &str = "Free";

/// Name of the seeded paid plan.
pub const PREMIUM_PLAN_NAME: &str = "Premium";

/// A billing plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Unique plan name.
    pub name: String,
    /// Monthly price.
    pub price: Money,
    /// Maximum quotes per billing period; `None` means unlimited.
    pub quote_limit: Option<u32>,
}

impl Plan {
    /// Creates a plan.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Money, quote_limit: Option<u32>) -> Self {
        Self {
            name: name.into(),
            price,
            quote_limit,
        }
    }

    /// Plans created on first start.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(FREE_PLAN_NAME, Money::ZERO, Some(10)),
            Self::new(PREMIUM_PLAN_NAME, Money::from_minor(2990), Some(5000)),
        ]
    }
}

/// What the quota guard needs to know about a user's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    /// Billing state.
    pub status: SubscriptionStatus,
    /// End of the paid period, if the provider reported one.
    pub current_period_end: Option<Timestamp>,
    /// Quotes issued so far; only ever increases.
    pub quote_count: u32,
    /// Plan limit; `None` means unlimited.
    pub quote_limit: Option<u32>,
}

impl QuotaState {
    /// Returns true if the subscription is active and its period ends strictly
    /// after `now`. A missing period end counts as expired.
    #[must_use]
    pub fn is_current(&self, now: Timestamp) -> bool {
        self.status.is_active()
            && self
                .current_period_end
                .is_some_and(|end| end.is_after(&now))
    }

    /// Returns true if the plan limit has been reached.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.quote_limit
            .is_some_and(|limit| self.quote_count >= limit)
    }

    /// Quotes left in the period, or `None` if unlimited.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        self.quote_limit
            .map(|limit| limit.saturating_sub(self.quote_count))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state(limit: Option<u32>, count: u32) -> QuotaState {
        QuotaState {
            status: SubscriptionStatus::Active,
            current_period_end: Some(Timestamp::now().add_days(10)),
            quote_count: count,
            quote_limit: limit,
        }
    }

    #[test]
    fn exhausted_at_limit() {
        assert!(state(Some(5), 5).is_exhausted());
        assert!(state(Some(5), 6).is_exhausted());
        assert!(!state(Some(5), 4).is_exhausted());
        assert!(!state(None, 10_000).is_exhausted());
    }

    #[test]
    fn remaining_saturates() {
        assert_eq!(state(Some(5), 2).remaining(), Some(3));
        assert_eq!(state(Some(5), 9).remaining(), Some(0));
        assert_eq!(state(None, 9).remaining(), None);
    }

    #[test]
    fn missing_period_end_is_not_current() {
        let mut s = state(None, 0);
        s.current_period_end = None;
        assert!(!s.is_current(Timestamp::now()));
    }

    #[test]
    fn period_end_equal_to_now_is_not_current() {
        let now = Timestamp::now();
        let mut s = state(None, 0);
        s.current_period_end = Some(now);
        assert!(!s.is_current(now));
    }

    #[test]
    fn default_plans() {
        let plans = Plan::defaults();
        assert_eq!(plans.len(), 2);
        assert!(plans.iter().all(|p| p.quote_limit.is_some()));
    }
}
