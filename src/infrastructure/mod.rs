//! # Infrastructure Layer
//!
//! Adapters for storage and for the external carrier and distance APIs.

pub mod persistence;
pub mod providers;
