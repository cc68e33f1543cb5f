//! # Provider Ports
//!
//! Interfaces to the external carrier-rate and distance providers.
//!
//! Both are object-safe and used behind `Arc<dyn _>` so tests can swap in
//! scripted doubles.

use crate::domain::entities::{ShippingOption, ShippingRequest};
use crate::domain::value_objects::Distance;
use crate::infrastructure::providers::error::{DistanceError, ProviderResult};
use async_trait::async_trait;
use std::fmt;

/// Third-party carrier rates.
#[async_trait]
pub trait CarrierRateClient: Send + Sync + fmt::Debug {
    /// Fetches carrier options for a request, in provider order.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Api` - the provider answered with a non-success status
    /// - `ProviderError::Timeout` / `Connection` - transport failure
    async fn fetch(&self, request: &ShippingRequest) -> ProviderResult<Vec<ShippingOption>>;
}

/// Road distance between two location identifiers.
#[async_trait]
pub trait DistanceResolver: Send + Sync + fmt::Debug {
    /// Resolves driving distance and travel time.
    ///
    /// # Errors
    ///
    /// - `DistanceError::NotFound` - unknown endpoint or no route
    /// - `DistanceError::Transient` - network or provider failure
    async fn resolve(&self, origin: &str, destination: &str) -> Result<Distance, DistanceError>;
}
