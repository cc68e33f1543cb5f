//! # In-Memory Quote History Repository
//!
//! In-memory implementation of [`QuoteHistoryRepository`].

use crate::domain::entities::StoredQuote;
use crate::domain::value_objects::UserId;
use crate::infrastructure::persistence::traits::{
    QuoteHistoryRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`QuoteHistoryRepository`].
///
/// Records are kept in append order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuoteHistoryRepository {
    storage: Arc<RwLock<Vec<StoredQuote>>>,
}

impl InMemoryQuoteHistoryRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all users.
    pub async fn len(&self) -> usize {
        self.storage.read().await.len()
    }

    /// Returns true if nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl QuoteHistoryRepository for InMemoryQuoteHistoryRepository {
    async fn save(&self, quote: &StoredQuote) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if storage.iter().any(|q| q.id == quote.id) {
            return Err(RepositoryError::duplicate("Quote", quote.id.to_string()));
        }
        storage.push(quote.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: UserId) -> RepositoryResult<Vec<StoredQuote>> {
        let storage = self.storage.read().await;
        // Reverse first so equal timestamps keep newest-appended first.
        let mut quotes: Vec<StoredQuote> = storage
            .iter()
            .rev()
            .filter(|q| q.user_id == user_id)
            .cloned()
            .collect();
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quotes)
    }
}
