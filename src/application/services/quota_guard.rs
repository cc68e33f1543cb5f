//! # Quota Guard
//!
//! Loads a user's subscription and applies the quota policy from
//! [`crate::domain::services::quota_guard`]. Read-only.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::services::QuotaDecision;
use crate::domain::services::quota_guard::evaluate;
use crate::domain::value_objects::{Timestamp, UserId};
use crate::infrastructure::persistence::SubscriptionRepository;
use std::sync::Arc;
use tracing::debug;

/// Subscription quota gate.
#[derive(Debug, Clone)]
pub struct QuotaGuard {
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl QuotaGuard {
    /// Creates a guard over a subscription store.
    #[must_use]
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions }
    }

    /// Decides whether `principal` may quote now.
    ///
    /// An absent principal is denied without touching storage.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Repository` if the subscription cannot be read.
    pub async fn decide(&self, principal: Option<UserId>) -> ApplicationResult<QuotaDecision> {
        let state = match principal {
            Some(user_id) => self.subscriptions.find_quota_state(user_id).await?,
            None => None,
        };
        let decision = evaluate(principal, state.as_ref(), Timestamp::now());
        debug!(?principal, ?decision, "quota decision");
        Ok(decision)
    }

    /// Returns the allowed user, or the denial as an error.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Unauthenticated` - no principal
    /// - `ApplicationError::QuotaDenied` - inactive, expired or exhausted
    /// - `ApplicationError::Repository` - storage failure
    pub async fn check(&self, principal: Option<UserId>) -> ApplicationResult<UserId> {
        match self.decide(principal).await? {
            QuotaDecision::Allow(user_id) => Ok(user_id),
            QuotaDecision::Deny(denial) => Err(ApplicationError::from(denial)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::QuotaState;
    use crate::domain::services::QuotaDenial;
    use crate::domain::value_objects::SubscriptionStatus;
    use crate::infrastructure::persistence::in_memory::InMemorySubscriptionRepository;

    async fn guard_with(user: UserId, count: u32, limit: Option<u32>) -> QuotaGuard {
        let repo = InMemorySubscriptionRepository::new();
        repo.upsert(
            user,
            QuotaState {
                status: SubscriptionStatus::Active,
                current_period_end: Some(Timestamp::now().add_days(30)),
                quote_count: count,
                quote_limit: limit,
            },
        )
        .await;
        QuotaGuard::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn allows_under_limit() {
        let user = UserId::new_v4();
        let guard = guard_with(user, 9, Some(10)).await;
        assert_eq!(guard.check(Some(user)).await.unwrap(), user);
    }

    #[tokio::test]
    async fn denies_at_limit() {
        let user = UserId::new_v4();
        let guard = guard_with(user, 10, Some(10)).await;
        let err = guard.check(Some(user)).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::QuotaDenied(QuotaDenial::QuotaExceeded)
        ));
    }

    #[tokio::test]
    async fn denies_user_without_subscription() {
        let guard = guard_with(UserId::new_v4(), 0, None).await;
        let err = guard.check(Some(UserId::new_v4())).await.unwrap_err();
        assert_eq!(err.reason_code(), "QuotaDenied");
        assert_eq!(err.detail(), Some("NoActiveSubscription"));
    }

    #[tokio::test]
    async fn denies_missing_principal() {
        let guard = guard_with(UserId::new_v4(), 0, None).await;
        let err = guard.check(None).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthenticated));
    }
}
