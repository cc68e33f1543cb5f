//! # Request Handlers
//!
//! Wire formats and handler functions for the quote endpoints.
//!
//! Prices leave the service as JSON numbers in major currency units; inside
//! the crate they stay integer minor units.

use crate::api::rest::auth::{JwtAuthenticator, MaybePrincipal};
use crate::api::rest::error::{ApiError, ApiResult};
use crate::application::error::ApplicationError;
use crate::application::services::{QuoteAggregator, QuoteHistoryEntry, QuoteHistoryService};
use crate::domain::entities::{PackageDimensions, ShippingOption, ShippingRequest};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

// ============================================================================
// State
// ============================================================================

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Quote orchestrator.
    pub aggregator: Arc<QuoteAggregator>,
    /// History reader.
    pub history: Arc<QuoteHistoryService>,
    /// Bearer token verifier.
    pub authenticator: Arc<JwtAuthenticator>,
}

impl FromRef<AppState> for Arc<JwtAuthenticator> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.authenticator)
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Package dimensions on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackageDto {
    /// Weight.
    pub weight: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Length.
    pub length: f64,
}

impl From<&PackageDimensions> for PackageDto {
    fn from(package: &PackageDimensions) -> Self {
        Self {
            weight: package.weight(),
            width: package.width(),
            height: package.height(),
            length: package.length(),
        }
    }
}

/// Body of `POST /quotes/calculate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestDto {
    /// Origin postal code.
    pub from_postal_code: String,
    /// Destination postal code.
    pub to_postal_code: String,
    /// Package. Older clients send it as `aPackage`.
    #[serde(alias = "aPackage")]
    pub package: PackageDto,
}

impl TryFrom<QuoteRequestDto> for ShippingRequest {
    type Error = ApplicationError;

    fn try_from(dto: QuoteRequestDto) -> Result<Self, Self::Error> {
        let package = PackageDimensions::new(
            dto.package.weight,
            dto.package.width,
            dto.package.height,
            dto.package.length,
        )?;
        Ok(ShippingRequest::new(dto.from_postal_code, dto.to_postal_code, package)?)
    }
}

/// One priced option on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOptionDto {
    /// Carrier or driver name.
    pub carrier: String,
    /// Service name.
    pub service: String,
    /// Price in major units.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Delivery time in provider units; `0` for local drivers.
    pub delivery_time: u32,
}

impl From<&ShippingOption> for ShippingOptionDto {
    fn from(option: &ShippingOption) -> Self {
        Self {
            carrier: option.carrier().to_string(),
            service: option.service().to_string(),
            price: option.price().to_decimal(),
            delivery_time: option.delivery_time(),
        }
    }
}

/// Response of `POST /quotes/calculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// Merged options, carrier first.
    pub options: Vec<ShippingOptionDto>,
}

/// One entry of `GET /quotes/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteHistoryDto {
    /// Record id.
    pub id: Uuid,
    /// Origin postal code.
    pub origin: String,
    /// Destination postal code.
    pub destination: String,
    /// Package, absent when the stored request could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageDto>,
    /// Options returned at quote time.
    pub options: Vec<ShippingOptionDto>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&QuoteHistoryEntry> for QuoteHistoryDto {
    fn from(entry: &QuoteHistoryEntry) -> Self {
        Self {
            id: entry.id.get(),
            origin: entry.origin.clone(),
            destination: entry.destination.clone(),
            package: entry.package.as_ref().map(PackageDto::from),
            options: entry.options.iter().map(ShippingOptionDto::from).collect(),
            created_at: *entry.created_at.as_datetime(),
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// `POST /quotes/calculate`
///
/// # Errors
///
/// See [`ApiError`] for the status mapping.
#[instrument(skip_all)]
pub async fn calculate_quote(
    State(state): State<AppState>,
    principal: MaybePrincipal,
    body: Result<Json<QuoteRequestDto>, JsonRejection>,
) -> ApiResult<Json<QuoteResponse>> {
    let Json(dto) = body?;
    let request = ShippingRequest::try_from(dto)?;

    let result = state.aggregator.aggregate(&request, principal.user_id()).await?;
    debug!(
        carrier = result.carrier_count,
        local = result.local_count,
        "quote served"
    );

    Ok(Json(QuoteResponse {
        options: result.options.iter().map(ShippingOptionDto::from).collect(),
    }))
}

/// `GET /quotes/history`
///
/// # Errors
///
/// 401 without a valid principal, 500 on storage failure.
#[instrument(skip_all)]
pub async fn quote_history(
    State(state): State<AppState>,
    principal: MaybePrincipal,
) -> ApiResult<Json<Vec<QuoteHistoryDto>>> {
    let entries = state
        .history
        .list(principal.user_id())
        .await
        .map_err(ApiError::from)?;
    Ok(Json(entries.iter().map(QuoteHistoryDto::from).collect()))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
