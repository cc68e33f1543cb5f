//! # Domain Entities
//!
//! - [`ShippingRequest`], [`ShippingOption`]: per-call request and priced options
//! - [`TrustedDriver`], [`PricingTier`]: a user's local delivery roster
//! - [`QuotaState`], [`Plan`]: subscription quota inputs
//! - [`QuoteRecord`]: immutable quote history entry

pub mod driver;
pub mod quote_record;
pub mod shipping;
pub mod subscription;

pub use driver::{PricingTier, TrustedDriver};
pub use quote_record::{QuoteRecord, StoredQuote};
pub use shipping::{PackageDimensions, ShippingOption, ShippingRequest};
pub use subscription::{Plan, QuotaState};
