//! # rotacerta-quotes
//!
//! Hybrid shipping quote engine.
//!
//! A quote merges carrier rates fetched from a third-party provider with
//! prices computed from the caller's own trusted drivers, each priced by
//! road-distance tiers. Quoting is gated by the caller's subscription quota
//! and every successful quote is kept in a per-user history.
//!
//! # Layers
//!
//! - [`domain`]: entities, value objects and the pure pricing and quota rules
//! - [`application`]: the quoting and history use cases
//! - [`infrastructure`]: PostgreSQL and in-memory repositories, HTTP providers
//! - [`api`]: axum REST surface with bearer authentication
//! - [`server`]: wiring from [`config::AppConfig`] to a running router

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod server;
pub mod telemetry;
