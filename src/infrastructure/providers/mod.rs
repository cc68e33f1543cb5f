//! # External Providers
//!
//! Adapters for the third-party services a quote depends on.
//!
//! ## Available Adapters
//!
//! - [`MelhorEnvioClient`]: carrier rates
//! - [`GoogleDistanceResolver`]: driving distance

pub mod error;
pub mod google_maps;
pub mod http_client;
pub mod melhor_envio;
pub mod traits;

pub use error::{DistanceError, ProviderError, ProviderResult};
pub use google_maps::GoogleDistanceResolver;
pub use http_client::HttpClient;
pub use melhor_envio::{MelhorEnvioClient, MelhorEnvioConfig, map_carrier_response};
pub use traits::{CarrierRateClient, DistanceResolver};
