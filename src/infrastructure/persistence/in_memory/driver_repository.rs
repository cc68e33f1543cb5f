//! # In-Memory Trusted Driver Repository
//!
//! In-memory implementation of [`TrustedDriverRepository`] for tests and
//! local runs.

use crate::domain::entities::TrustedDriver;
use crate::domain::value_objects::UserId;
use crate::infrastructure::persistence::traits::{RepositoryResult, TrustedDriverRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`TrustedDriverRepository`].
///
/// Rosters keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrustedDriverRepository {
    storage: Arc<RwLock<HashMap<UserId, Vec<TrustedDriver>>>>,
}

impl InMemoryTrustedDriverRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a driver to its owner's roster.
    pub async fn insert(&self, driver: TrustedDriver) {
        let mut storage = self.storage.write().await;
        storage.entry(driver.owner()).or_default().push(driver);
    }

    /// Removes every driver.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }
}

#[async_trait]
impl TrustedDriverRepository for InMemoryTrustedDriverRepository {
    async fn find_by_user(&self, user_id: UserId) -> RepositoryResult<Vec<TrustedDriver>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&user_id).cloned().unwrap_or_default())
    }
}
