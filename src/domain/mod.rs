//! # Domain Layer
//!
//! Shipping requests, driver pricing, subscription quota and quote history,
//! free of any I/O.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
