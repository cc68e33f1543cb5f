//! # HTTP Client
//!
//! Thin reqwest wrapper shared by the provider adapters.
//!
//! Every request carries the configured timeout. Non-2xx responses become
//! [`ProviderError::Api`] with the raw body preserved; transport failures
//! become `Timeout` or `Connection`.

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for provider adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> ProviderResult<Self> {
        Self::with_headers(timeout_ms, HeaderMap::new())
    }

    /// Creates a new HTTP client sending `default_headers` on every request.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be created.
    pub fn with_headers(timeout_ms: u64, default_headers: HeaderMap) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(default_headers)
            .build()
            .map_err(|e| ProviderError::internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request with query parameters and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `Timeout`/`Connection` on transport failure, `Api` on a
    /// non-success status and `Protocol` if the body is not the expected JSON.
    pub async fn get_with_params<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Makes a POST request with a JSON body and extra headers.
    ///
    /// # Errors
    ///
    /// Returns `Timeout`/`Connection` on transport failure, `Api` on a
    /// non-success status and `Protocol` if the body is not the expected JSON.
    pub async fn post_with_headers<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ProviderResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ProviderError::protocol(format!("failed to parse response: {e}")))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::api(status.as_u16(), body))
        }
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout_with_duration("request timed out", self.timeout_ms)
        } else if error.is_connect() {
            ProviderError::connection(format!("connection failed: {error}"))
        } else {
            ProviderError::connection(format!("HTTP request failed: {error}"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn new_client() {
        let client = HttpClient::new(5000).unwrap();
        assert_eq!(client.timeout_ms(), 5000);
    }

    #[tokio::test]
    async fn get_sends_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lookup"))
            .and(query_param("q", "x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000).unwrap();
        let body: Value = client
            .get_with_params(&format!("{}/lookup", server.uri()), &[("q", "x")])
            .await
            .unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn post_sends_headers_and_maps_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rates"))
            .and(header("authorization", "Bearer t"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad cep"))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer t".parse().unwrap());
        let err = client
            .post_with_headers::<Value, _>(&format!("{}/rates", server.uri()), &json!({}), headers)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert!(err.to_string().contains("bad cep"));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(50).unwrap();
        let err = client
            .get_with_params::<Value, _>(&server.uri(), &[("a", "b")])
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout { .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000).unwrap();
        let err = client
            .get_with_params::<Value, _>(&server.uri(), &[("a", "b")])
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Protocol { .. }));
    }
}
