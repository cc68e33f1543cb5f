//! # Melhor Envio Carrier Client
//!
//! [`CarrierRateClient`] backed by the Melhor Envio shipment calculator.
//!
//! `POST {api_url}/api/v2/me/shipment/calculate` with a bearer token:
//!
//! ```text
//! {"from":{"postal_code":"01310-100"},"to":{"postal_code":"04538-133"},
//!  "package":{"weight":1.5,"width":20.0,"height":10.0,"length":30.0}}
//! ```
//!
//! The response is an array with one entry per carrier service. Entries
//! without an `id`, or carrying an `error`, are dropped.

use crate::domain::entities::{ShippingOption, ShippingRequest};
use crate::domain::value_objects::Money;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::CarrierRateClient;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, warn};

/// Calculator path below the configured base URL.
pub const CALCULATE_PATH: &str = "/api/v2/me/shipment/calculate";

/// Placeholder for missing text fields.
const NOT_AVAILABLE: &str = "N/A";

/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Connection settings for Melhor Envio.
#[derive(Debug, Clone)]
pub struct MelhorEnvioConfig {
    api_url: String,
    api_token: String,
    user_agent: String,
    timeout_ms: u64,
}

impl MelhorEnvioConfig {
    /// Creates a configuration.
    #[must_use]
    pub fn new(
        api_url: impl Into<String>,
        api_token: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_token: api_token.into(),
            user_agent: user_agent.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Sets the HTTP timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Base URL.
    #[inline]
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// HTTP timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}

#[derive(Debug, Serialize)]
struct CalculateRequest<'a> {
    from: PostalCode<'a>,
    to: PostalCode<'a>,
    package: PackageBody,
}

#[derive(Debug, Serialize)]
struct PostalCode<'a> {
    postal_code: &'a str,
}

#[derive(Debug, Serialize)]
struct PackageBody {
    weight: f64,
    width: f64,
    height: f64,
    length: f64,
}

impl<'a> CalculateRequest<'a> {
    fn from_request(request: &'a ShippingRequest) -> Self {
        let package = request.package();
        Self {
            from: PostalCode {
                postal_code: request.origin(),
            },
            to: PostalCode {
                postal_code: request.destination(),
            },
            package: PackageBody {
                weight: package.weight(),
                width: package.width(),
                height: package.height(),
                length: package.length(),
            },
        }
    }
}

/// Melhor Envio carrier-rate client.
#[derive(Debug, Clone)]
pub struct MelhorEnvioClient {
    http: HttpClient,
    endpoint: String,
}

impl MelhorEnvioClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the token or user agent are not
    /// valid header values, or the HTTP client cannot be built.
    pub fn new(config: &MelhorEnvioConfig) -> ProviderResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ProviderError::internal(format!("invalid user agent: {e}")))?,
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|e| ProviderError::internal(format!("invalid api token: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        Ok(Self {
            http: HttpClient::with_headers(config.timeout_ms, headers)?,
            endpoint: format!("{}{}", config.api_url.trim_end_matches('/'), CALCULATE_PATH),
        })
    }
}

#[async_trait]
impl CarrierRateClient for MelhorEnvioClient {
    async fn fetch(&self, request: &ShippingRequest) -> ProviderResult<Vec<ShippingOption>> {
        let body = CalculateRequest::from_request(request);
        let response: Value = self
            .http
            .post_with_headers(&self.endpoint, &body, HeaderMap::new())
            .await?;

        let options = map_carrier_response(&response);
        debug!(count = options.len(), "carrier options received");
        Ok(options)
    }
}

/// Maps a raw calculator response to shipping options.
///
/// A non-array response maps to no options. Missing text fields become
/// `"N/A"`; a missing or unparseable price or delivery time becomes zero.
#[must_use]
pub fn map_carrier_response(response: &Value) -> Vec<ShippingOption> {
    let Some(entries) = response.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            if entry.get("id").is_none() {
                return None;
            }
            if let Some(error) = entry.get("error") {
                warn!(
                    id = %entry["id"],
                    error = %error,
                    "dropping carrier entry with error"
                );
                return None;
            }
            Some(map_entry(entry))
        })
        .collect()
}

fn map_entry(entry: &Value) -> ShippingOption {
    let carrier = entry
        .pointer("/company/name")
        .and_then(Value::as_str)
        .unwrap_or(NOT_AVAILABLE);
    let service = entry
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(NOT_AVAILABLE);
    let price = entry.get("price").map_or(Money::ZERO, parse_price);
    let delivery_time = entry.get("delivery_time").map_or(0, parse_delivery_time);

    ShippingOption::new(carrier, service, price, delivery_time)
}

fn parse_price(value: &Value) -> Money {
    let parsed = match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    };
    parsed
        .and_then(|d| Money::from_decimal(d).ok())
        .unwrap_or(Money::ZERO)
}

fn parse_delivery_time(value: &Value) -> u32 {
    let days = match value {
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    days.and_then(|d| u32::try_from(d).ok()).unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::entities::PackageDimensions;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ShippingRequest {
        ShippingRequest::new(
            "01310-100",
            "04538-133",
            PackageDimensions::new(1.5, 20.0, 10.0, 30.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn maps_valid_entries_in_order() {
        let options = map_carrier_response(&json!([
            {"id": 1, "name": "PAC", "price": "18.40", "delivery_time": 7, "company": {"name": "Correios"}},
            {"id": 2, "name": "SEDEX", "price": 25.9, "delivery_time": 3, "company": {"name": "Correios"}}
        ]));

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].service(), "PAC");
        assert_eq!(options[0].price(), Money::from_minor(1840));
        assert_eq!(options[1].price(), Money::from_minor(2590));
        assert_eq!(options[1].delivery_time(), 3);
    }

    #[test]
    fn drops_entries_with_error_even_with_id() {
        let options = map_carrier_response(&json!([
            {"id": 3, "name": "Mini", "error": "Serviço indisponível", "company": {"name": "Correios"}},
            {"id": 4, "name": ".Package", "price": "19.99", "delivery_time": 5, "company": {"name": "Jadlog"}}
        ]));

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].carrier(), "Jadlog");
    }

    #[test]
    fn drops_entries_without_id() {
        let options = map_carrier_response(&json!([{"name": "X", "price": 1}]));
        assert!(options.is_empty());
    }

    #[test]
    fn missing_fields_get_defaults() {
        let options = map_carrier_response(&json!([{"id": 9}]));
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].carrier(), "N/A");
        assert_eq!(options[0].service(), "N/A");
        assert_eq!(options[0].price(), Money::ZERO);
        assert_eq!(options[0].delivery_time(), 0);
    }

    #[test]
    fn delivery_time_accepts_numeric_strings() {
        let options = map_carrier_response(&json!([
            {"id": 1, "delivery_time": "5"},
            {"id": 2, "delivery_time": " 12 "},
            {"id": 3, "delivery_time": 8},
            {"id": 4, "delivery_time": "soon"},
            {"id": 5, "delivery_time": -1},
        ]));
        let days: Vec<u32> = options.iter().map(ShippingOption::delivery_time).collect();
        assert_eq!(days, vec![5, 12, 8, 0, 0]);
    }

    #[test]
    fn unparseable_price_is_zero() {
        let options = map_carrier_response(&json!([{"id": 1, "price": "abc"}]));
        assert_eq!(options[0].price(), Money::ZERO);
    }

    #[test]
    fn price_rounds_half_even() {
        let options = map_carrier_response(&json!([
            {"id": 1, "price": "10.125"},
            {"id": 2, "price": "10.135"}
        ]));
        assert_eq!(options[0].price(), Money::from_minor(1012));
        assert_eq!(options[1].price(), Money::from_minor(1014));
    }

    #[test]
    fn non_array_response_is_empty() {
        assert!(map_carrier_response(&json!({"message": "Unauthenticated."})).is_empty());
        assert!(map_carrier_response(&Value::Null).is_empty());
    }

    #[tokio::test]
    async fn fetch_posts_calculator_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CALCULATE_PATH))
            .and(header("authorization", "Bearer secret"))
            .and(header("user-agent", "rotacerta (ops@example.com)"))
            .and(header("accept", "application/json"))
            .and(body_json(json!({
                "from": {"postal_code": "01310-100"},
                "to": {"postal_code": "04538-133"},
                "package": {"weight": 1.5, "width": 20.0, "height": 10.0, "length": 30.0}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "SEDEX", "price": "25.90", "delivery_time": 3, "company": {"name": "Correios"}}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let config = MelhorEnvioConfig::new(server.uri(), "secret", "rotacerta (ops@example.com)");
        let client = MelhorEnvioClient::new(&config).unwrap();
        let options = client.fetch(&request()).await.unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].carrier(), "Correios");
    }

    #[tokio::test]
    async fn fetch_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"Unauthenticated."}"#))
            .mount(&server)
            .await;

        let config = MelhorEnvioConfig::new(server.uri(), "bad", "rotacerta");
        let client = MelhorEnvioClient::new(&config).unwrap();
        let err = client.fetch(&request()).await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("Unauthenticated"));
    }

    #[test]
    fn invalid_token_rejected_at_construction() {
        let config = MelhorEnvioConfig::new("http://localhost", "bad\ntoken", "ua");
        assert!(matches!(
            MelhorEnvioClient::new(&config),
            Err(ProviderError::Internal { .. })
        ));
    }
}
