//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! # Available Repositories
//!
//! - [`TrustedDriverRepository`]: a user's driver roster and pricing tiers
//! - [`SubscriptionRepository`]: quota state and usage counter
//! - [`QuoteHistoryRepository`]: append-only quote history
//!
//! # Examples
//!
//! ```ignore
//! use rotacerta_quotes::infrastructure::persistence::traits::QuoteHistoryRepository;
//!
//! async fn latest(repo: &impl QuoteHistoryRepository, user: UserId) {
//!     let history = repo.find_by_user(user).await?;
//!     println!("{} quotes", history.len());
//! }
//! ```

use crate::domain::entities::{QuotaState, StoredQuote, TrustedDriver};
use crate::domain::value_objects::UserId;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Stored data could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::connection(error.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::serialization(error.to_string())
            }
            other => Self::query(other.to_string()),
        }
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Read access to a user's trusted drivers.
#[async_trait]
pub trait TrustedDriverRepository: Send + Sync + fmt::Debug {
    /// Returns the user's roster in a stable order, each driver with its
    /// tiers in attachment order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn find_by_user(&self, user_id: UserId) -> RepositoryResult<Vec<TrustedDriver>>;
}

/// Subscription quota state.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync + fmt::Debug {
    /// Loads the quota state, or `None` if the user has no subscription.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn find_quota_state(&self, user_id: UserId) -> RepositoryResult<Option<QuotaState>>;

    /// Adds one to the user's quote counter in a single atomic update.
    ///
    /// Returns `false` if the user has no subscription.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the update fails.
    async fn increment_quote_count(&self, user_id: UserId) -> RepositoryResult<bool>;
}

/// Append-only quote history.
#[async_trait]
pub trait QuoteHistoryRepository: Send + Sync + fmt::Debug {
    /// Appends a record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the id is already stored.
    async fn save(&self, quote: &StoredQuote) -> RepositoryResult<()>;

    /// Returns the user's records, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    async fn find_by_user(&self, user_id: UserId) -> RepositoryResult<Vec<StoredQuote>>;
}
