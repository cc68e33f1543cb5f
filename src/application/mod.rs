//! # Application Layer
//!
//! Quoting and history use cases.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
