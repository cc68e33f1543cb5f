//! # Persistence Layer
//!
//! ## Repository Traits (Ports)
//!
//! - [`TrustedDriverRepository`]: driver rosters
//! - [`SubscriptionRepository`]: quota state and usage counter
//! - [`QuoteHistoryRepository`]: quote history
//!
//! ## Implementations
//!
//! - `in_memory`: tests and database-less runs
//! - `postgres`: PostgreSQL via `sqlx`

pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use traits::{
    QuoteHistoryRepository, RepositoryError, RepositoryResult, SubscriptionRepository,
    TrustedDriverRepository,
};
