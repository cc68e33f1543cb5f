//! # Google Distance Matrix Resolver
//!
//! [`DistanceResolver`] backed by the Google Distance Matrix API.
//!
//! One origin and one destination per call, driving mode, metric units.
//! Only the first element of the first row is read.

use crate::domain::value_objects::Distance;
use crate::infrastructure::providers::error::{DistanceError, ProviderError};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::DistanceResolver;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Distance Matrix path below the configured base URL.
pub const DISTANCE_MATRIX_PATH: &str = "/maps/api/distancematrix/json";

const STATUS_OK: &str = "OK";

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<ValueField>,
    duration: Option<ValueField>,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: u64,
}

/// Google Distance Matrix client.
#[derive(Debug, Clone)]
pub struct GoogleDistanceResolver {
    http: HttpClient,
    endpoint: String,
    api_key: String,
}

impl GoogleDistanceResolver {
    /// Creates a resolver against `api_url` (normally `https://maps.googleapis.com`).
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the HTTP client cannot be built.
    pub fn new(
        api_url: &str,
        api_key: impl Into<String>,
        timeout_ms: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http: HttpClient::new(timeout_ms)?,
            endpoint: format!("{}{}", api_url.trim_end_matches('/'), DISTANCE_MATRIX_PATH),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl DistanceResolver for GoogleDistanceResolver {
    async fn resolve(&self, origin: &str, destination: &str) -> Result<Distance, DistanceError> {
        let params = [
            ("origins", origin),
            ("destinations", destination),
            ("mode", "driving"),
            ("units", "metric"),
            ("key", self.api_key.as_str()),
        ];
        let response: MatrixResponse = self.http.get_with_params(&self.endpoint, &params).await?;

        if response.status != STATUS_OK {
            let detail = response.error_message.unwrap_or_default();
            return Err(ProviderError::protocol(format!(
                "distance matrix status {}: {detail}",
                response.status
            ))
            .into());
        }

        let element = response
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| DistanceError::not_found(origin, destination))?;

        if element.status != STATUS_OK {
            debug!(status = %element.status, origin, destination, "no route");
            return Err(DistanceError::not_found(origin, destination));
        }

        let meters = element
            .distance
            .ok_or_else(|| DistanceError::not_found(origin, destination))?
            .value;
        let eta_seconds = element.duration.map_or(0, |d| d.value);

        Ok(Distance::new(meters, eta_seconds))
    }
}
