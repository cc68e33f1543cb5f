//! # API Layer
//!
//! HTTP surface of the quote engine.

pub mod rest;
