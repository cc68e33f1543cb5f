//! # Application Services
//!
//! Use cases over the domain and the infrastructure ports.
//!
//! - [`QuoteAggregator`]: guarded, concurrent hybrid quoting
//! - [`LocalDriverQuoteEngine`]: distance-tier pricing over a driver roster
//! - [`QuotaGuard`]: subscription admission
//! - [`QuoteHistoryService`]: quote history listing

pub mod local_quotes;
pub mod quota_guard;
pub mod quote_aggregation;
pub mod quote_history;

pub use local_quotes::{LocalDriverQuoteEngine, LocalQuoteConfig};
pub use quota_guard::QuotaGuard;
pub use quote_aggregation::{AggregationConfig, QuoteAggregator, QuotePorts, QuoteResult};
pub use quote_history::{QuoteHistoryEntry, QuoteHistoryService};
