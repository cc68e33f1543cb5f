//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`UserId`], [`DriverId`], [`QuoteId`]: UUID-based identifiers
//!
//! ## Quantities
//!
//! - [`Money`]: integer minor-unit amounts
//! - [`Distance`]: road distance with exact kilometre conversion
//! - [`Timestamp`]: UTC instants
//!
//! ## Domain Enums
//!
//! - [`SubscriptionStatus`]: billing state

pub mod distance;
pub mod enums;
pub mod ids;
pub mod money;
pub mod timestamp;

pub use distance::Distance;
pub use enums::{ParseEnumError, SubscriptionStatus};
pub use ids::{DriverId, QuoteId, UserId};
pub use money::{Money, MoneyError};
pub use timestamp::Timestamp;
