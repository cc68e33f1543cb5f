//! # Quote Records
//!
//! Immutable history entries written once per successful quote.
//!
//! The request and the resulting options are stored as JSON documents tagged
//! with a `schema_version`. New versions get a new enum variant; readers keep
//! decoding every version they have ever written.
//!
//! ```text
//! {"schema_version":"1","origin":"01310-100","destination":"04538-133",
//!  "package":{"weight":1.5,"width":20.0,"height":10.0,"length":30.0}}
//! {"schema_version":"1","options":[{"carrier":"Correios","service":"SEDEX",
//!  "price_minor":2590,"delivery_time":3}]}
//! ```

use crate::domain::entities::shipping::{PackageDimensions, ShippingOption, ShippingRequest};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, QuoteId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "schema_version")]
enum RequestPayload {
    #[serde(rename = "1")]
    V1(RequestPayloadV1),
}

#[derive(Debug, Serialize, Deserialize)]
struct RequestPayloadV1 {
    origin: String,
    destination: String,
    package: PackagePayloadV1,
}

#[derive(Debug, Serialize, Deserialize)]
struct PackagePayloadV1 {
    weight: f64,
    width: f64,
    height: f64,
    length: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "schema_version")]
enum ResultPayload {
    #[serde(rename = "1")]
    V1(ResultPayloadV1),
}

#[derive(Debug, Serialize, Deserialize)]
struct ResultPayloadV1 {
    options: Vec<OptionPayloadV1>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OptionPayloadV1 {
    carrier: String,
    service: String,
    price_minor: i64,
    delivery_time: u32,
}

/// Storage form of a quote record.
///
/// Origin, destination and creation time are kept as plain columns for
/// indexing; request and result are opaque versioned documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuote {
    /// Record identifier.
    pub id: QuoteId,
    /// Owner.
    pub user_id: UserId,
    /// Origin postal code.
    pub origin: String,
    /// Destination postal code.
    pub destination: String,
    /// Versioned request document.
    pub request_payload: serde_json::Value,
    /// Versioned result document.
    pub result_payload: serde_json::Value,
    /// Creation time.
    pub created_at: Timestamp,
}

/// One successful quote, as returned to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    id: QuoteId,
    user_id: UserId,
    request: ShippingRequest,
    options: Vec<ShippingOption>,
    created_at: Timestamp,
}

impl QuoteRecord {
    /// Creates a new record stamped with the current time.
    #[must_use]
    pub fn new(user_id: UserId, request: ShippingRequest, options: Vec<ShippingOption>) -> Self {
        Self {
            id: QuoteId::new_v4(),
            user_id,
            request,
            options,
            created_at: Timestamp::now(),
        }
    }

    /// Record identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> QuoteId {
        self.id
    }

    /// Owner.
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The request that was quoted.
    #[inline]
    #[must_use]
    pub fn request(&self) -> &ShippingRequest {
        &self.request
    }

    /// The merged options, carrier first.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &[ShippingOption] {
        &self.options
    }

    /// Creation time.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Encodes the record for storage at the current schema version.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPayload` if serialization fails.
    pub fn to_stored(&self) -> DomainResult<StoredQuote> {
        let package = self.request.package();
        let request = RequestPayload::V1(RequestPayloadV1 {
            origin: self.request.origin().to_string(),
            destination: self.request.destination().to_string(),
            package: PackagePayloadV1 {
                weight: package.weight(),
                width: package.width(),
                height: package.height(),
                length: package.length(),
            },
        });
        let result = ResultPayload::V1(ResultPayloadV1 {
            options: self
                .options
                .iter()
                .map(|o| OptionPayloadV1 {
                    carrier: o.carrier().to_string(),
                    service: o.service().to_string(),
                    price_minor: o.price().minor_units(),
                    delivery_time: o.delivery_time(),
                })
                .collect(),
        });

        Ok(StoredQuote {
            id: self.id,
            user_id: self.user_id,
            origin: self.request.origin().to_string(),
            destination: self.request.destination().to_string(),
            request_payload: to_json(&request)?,
            result_payload: to_json(&result)?,
            created_at: self.created_at,
        })
    }

    /// Decodes a stored record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPayload` if either document is malformed
    /// or carries an unknown schema version.
    pub fn from_stored(stored: &StoredQuote) -> DomainResult<Self> {
        Ok(Self {
            id: stored.id,
            user_id: stored.user_id,
            request: decode_request(&stored.request_payload)?,
            options: decode_options(&stored.result_payload)?,
            created_at: stored.created_at,
        })
    }
}

/// Decodes a versioned request document.
///
/// # Errors
///
/// Returns `DomainError::InvalidPayload` on malformed or unknown documents.
pub fn decode_request(value: &serde_json::Value) -> DomainResult<ShippingRequest> {
    let payload: RequestPayload = serde_json::from_value(value.clone())
        .map_err(|e| DomainError::InvalidPayload(e.to_string()))?;
    match payload {
        RequestPayload::V1(v1) => {
            let package = PackageDimensions::new(
                v1.package.weight,
                v1.package.width,
                v1.package.height,
                v1.package.length,
            )?;
            ShippingRequest::new(v1.origin, v1.destination, package)
        }
    }
}

/// Decodes a versioned result document.
///
/// # Errors
///
/// Returns `DomainError::InvalidPayload` on malformed or unknown documents.
pub fn decode_options(value: &serde_json::Value) -> DomainResult<Vec<ShippingOption>> {
    let payload: ResultPayload = serde_json::from_value(value.clone())
        .map_err(|e| DomainError::InvalidPayload(e.to_string()))?;
    match payload {
        ResultPayload::V1(v1) => Ok(v1
            .options
            .into_iter()
            .map(|o| {
                ShippingOption::new(
                    o.carrier,
                    o.service,
                    Money::from_minor(o.price_minor),
                    o.delivery_time,
                )
            })
            .collect()),
    }
}

fn to_json<T: Serialize>(value: &T) -> DomainResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| DomainError::InvalidPayload(e.to_string()))
}
