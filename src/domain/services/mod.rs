//! # Domain Services
//!
//! Stateless rules that span several entities.
//!
//! ## Services
//!
//! - [`tier_pricing::TierPricingMatcher`]: first-match distance tier pricing
//! - [`quota_guard::evaluate`]: subscription quota admission

pub mod quota_guard;
pub mod tier_pricing;

pub use quota_guard::{QuotaDecision, QuotaDenial};
pub use tier_pricing::TierPricingMatcher;
