//! # In-Memory Repositories
//!
//! In-memory implementations for tests and database-less runs.
//!
//! ## Available Repositories
//!
//! - [`InMemoryTrustedDriverRepository`]: driver rosters
//! - [`InMemorySubscriptionRepository`]: quota state
//! - [`InMemoryQuoteHistoryRepository`]: quote history
//!
//! ## Thread Safety
//!
//! All implementations use `Arc<RwLock<_>>` for thread-safe access.

pub mod driver_repository;
pub mod quote_history_repository;
pub mod subscription_repository;

pub use driver_repository::InMemoryTrustedDriverRepository;
pub use quote_history_repository::InMemoryQuoteHistoryRepository;
pub use subscription_repository::InMemorySubscriptionRepository;
