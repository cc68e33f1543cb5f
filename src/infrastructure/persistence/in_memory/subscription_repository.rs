//! # In-Memory Subscription Repository
//!
//! In-memory implementation of [`SubscriptionRepository`].

use crate::domain::entities::QuotaState;
use crate::domain::value_objects::UserId;
use crate::infrastructure::persistence::traits::{RepositoryResult, SubscriptionRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`SubscriptionRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriptionRepository {
    storage: Arc<RwLock<HashMap<UserId, QuotaState>>>,
}

impl InMemorySubscriptionRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user's quota state.
    pub async fn upsert(&self, user_id: UserId, state: QuotaState) {
        self.storage.write().await.insert(user_id, state);
    }

    /// Current counter, if the user has a subscription.
    pub async fn quote_count(&self, user_id: UserId) -> Option<u32> {
        self.storage
            .read()
            .await
            .get(&user_id)
            .map(|s| s.quote_count)
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_quota_state(&self, user_id: UserId) -> RepositoryResult<Option<QuotaState>> {
        Ok(self.storage.read().await.get(&user_id).copied())
    }

    async fn increment_quote_count(&self, user_id: UserId) -> RepositoryResult<bool> {
        let mut storage = self.storage.write().await;
        match storage.get_mut(&user_id) {
            Some(state) => {
                state.quote_count = state.quote_count.saturating_add(1);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
