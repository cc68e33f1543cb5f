//! # PostgreSQL Repositories
//!
//! `sqlx` implementations of the repository ports. Schema lives in
//! `migrations/`.

pub mod driver_repository;
pub mod plan_seeder;
pub mod quote_history_repository;
pub mod subscription_repository;

pub use driver_repository::PostgresTrustedDriverRepository;
pub use plan_seeder::seed_plans;
pub use quote_history_repository::PostgresQuoteHistoryRepository;
pub use subscription_repository::PostgresSubscriptionRepository;
