//! # Routes
//!
//! Router assembly for the REST API.

use crate::api::rest::handlers::{AppState, calculate_quote, health, quote_history};
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/quotes/calculate", post(calculate_quote))
        .route("/quotes/history", get(quote_history))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::api::rest::auth::JwtAuthenticator;
    use crate::api::rest::auth::test_support::{ISSUER, SECRET, token_for};
    use crate::application::services::{
        AggregationConfig, LocalDriverQuoteEngine, LocalQuoteConfig, QuoteAggregator,
        QuoteHistoryService, QuotePorts,
    };
    use crate::domain::entities::{
        PricingTier, QuotaState, QuoteRecord, ShippingOption, ShippingRequest, TrustedDriver,
    };
    use crate::domain::value_objects::{Distance, Money, SubscriptionStatus, Timestamp, UserId};
    use crate::infrastructure::persistence::QuoteHistoryRepository;
    use crate::infrastructure::persistence::in_memory::{
        InMemoryQuoteHistoryRepository, InMemorySubscriptionRepository,
        InMemoryTrustedDriverRepository,
    };
    use crate::infrastructure::providers::{
        CarrierRateClient, DistanceError, DistanceResolver, ProviderError, ProviderResult,
    };
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[derive(Debug)]
    struct StubCarrier(ProviderResult<Vec<ShippingOption>>);

    #[async_trait]
    impl CarrierRateClient for StubCarrier {
        async fn fetch(&self, _request: &ShippingRequest) -> ProviderResult<Vec<ShippingOption>> {
            self.0.clone()
        }
    }

    #[derive(Debug)]
    struct StubDistance(u64);

    #[async_trait]
    impl DistanceResolver for StubDistance {
        async fn resolve(&self, _o: &str, _d: &str) -> Result<Distance, DistanceError> {
            Ok(Distance::new(self.0 * 1000, 1800))
        }
    }

    struct TestApp {
        router: Router,
        user: UserId,
        subscriptions: InMemorySubscriptionRepository,
        history: InMemoryQuoteHistoryRepository,
    }

    fn quota(count: u32, limit: Option<u32>) -> QuotaState {
        QuotaState {
            status: SubscriptionStatus::Active,
            current_period_end: Some(Timestamp::now().add_days(30)),
            quote_count: count,
            quote_limit: limit,
        }
    }

    fn tier(min: i64, max: i64, price: i64) -> PricingTier {
        PricingTier::new(Decimal::from(min), Decimal::from(max), Money::from_minor(price)).unwrap()
    }

    async fn app(carrier: ProviderResult<Vec<ShippingOption>>, state: Option<QuotaState>) -> TestApp {
        let user = UserId::new_v4();

        let subscriptions = InMemorySubscriptionRepository::new();
        if let Some(state) = state {
            subscriptions.upsert(user, state).await;
        }
        let drivers = InMemoryTrustedDriverRepository::new();
        drivers
            .insert(TrustedDriver::new(user, "A", "Moto").with_tier(tier(0, 50, 2000)))
            .await;
        drivers
            .insert(TrustedDriver::new(user, "B", "Van").with_tier(tier(51, 100, 1500)))
            .await;
        let history = InMemoryQuoteHistoryRepository::new();

        let ports = QuotePorts {
            carrier: Arc::new(StubCarrier(carrier)),
            drivers: Arc::new(drivers),
            subscriptions: Arc::new(subscriptions.clone()),
            history: Arc::new(history.clone()),
        };
        let local = LocalDriverQuoteEngine::new(Arc::new(StubDistance(45)), LocalQuoteConfig::default());
        let aggregator = QuoteAggregator::new(ports, local, AggregationConfig::default());

        let state = AppState {
            aggregator: Arc::new(aggregator),
            history: Arc::new(QuoteHistoryService::new(Arc::new(history.clone()))),
            authenticator: Arc::new(JwtAuthenticator::new(SECRET, Some(ISSUER))),
        };

        TestApp {
            router: create_router(state),
            user,
            subscriptions,
            history,
        }
    }

    fn sedex() -> Vec<ShippingOption> {
        vec![ShippingOption::new("Correios", "SEDEX", Money::from_minor(2590), 3)]
    }

    fn quote_request(token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/quotes/calculate")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "fromPostalCode": "01310-100",
            "toPostalCode": "04538-133",
            "package": {"weight": 1.5, "width": 20, "height": 10, "length": 30}
        })
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = app(Ok(vec![]), None).await;
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn calculate_merges_carrier_then_local() {
        let app = app(Ok(sedex()), Some(quota(0, Some(10)))).await;
        let token = token_for(app.user);

        let (status, body) = send(app.router, quote_request(Some(&token), valid_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"options": [
                {"carrier": "Correios", "service": "SEDEX", "price": 25.9, "deliveryTime": 3},
                {"carrier": "A", "service": "Local Delivery", "price": 20.0, "deliveryTime": 0}
            ]})
        );
        assert_eq!(app.subscriptions.quote_count(app.user).await, Some(1));
        assert_eq!(app.history.len().await, 1);
    }

    #[tokio::test]
    async fn calculate_accepts_package_alias() {
        let app = app(Ok(sedex()), Some(quota(0, None))).await;
        let token = token_for(app.user);
        let body = json!({
            "fromPostalCode": "01310-100",
            "toPostalCode": "04538-133",
            "aPackage": {"weight": 1.5, "width": 20, "height": 10, "length": 30}
        });

        let (status, _) = send(app.router, quote_request(Some(&token), body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let app = app(Ok(sedex()), Some(quota(0, None))).await;
        let token = token_for(app.user);
        let body = json!({"fromPostalCode": "01310-100"});

        let (status, body) = send(app.router, quote_request(Some(&token), body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reason"], "Validation");
        assert_eq!(body["detail"], "InvalidBody");
    }

    #[tokio::test]
    async fn invalid_dimensions_are_400() {
        let app = app(Ok(sedex()), Some(quota(0, None))).await;
        let token = token_for(app.user);
        let body = json!({
            "fromPostalCode": "01310-100",
            "toPostalCode": "04538-133",
            "package": {"weight": -1, "width": 20, "height": 10, "length": 30}
        });

        let (status, body) = send(app.router, quote_request(Some(&token), body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reason"], "Validation");
        assert_eq!(app.subscriptions.quote_count(app.user).await, Some(0));
    }

    #[tokio::test]
    async fn missing_token_is_401() {
        let app = app(Ok(sedex()), Some(quota(0, None))).await;
        let (status, body) = send(app.router, quote_request(None, valid_body())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["reason"], "Unauthenticated");
    }

    #[tokio::test]
    async fn forged_token_is_401() {
        let app = app(Ok(sedex()), Some(quota(0, None))).await;
        let (status, body) =
            send(app.router, quote_request(Some("forged.token.value"), valid_body())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["reason"], "Unauthenticated");
        assert_eq!(body["detail"], "InvalidToken");
    }

    #[tokio::test]
    async fn exhausted_quota_is_403() {
        let app = app(Ok(sedex()), Some(quota(10, Some(10)))).await;
        let token = token_for(app.user);

        let (status, body) = send(app.router, quote_request(Some(&token), valid_body())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["reason"], "QuotaDenied");
        assert_eq!(body["detail"], "QuotaExceeded");
        assert!(app.history.is_empty().await);
    }

    #[tokio::test]
    async fn missing_subscription_is_403() {
        let app = app(Ok(sedex()), None).await;
        let token = token_for(app.user);

        let (status, body) = send(app.router, quote_request(Some(&token), valid_body())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["reason"], "QuotaDenied");
        assert_eq!(body["detail"], "NoActiveSubscription");
    }

    #[tokio::test]
    async fn carrier_failure_is_424() {
        let app = app(
            Err(ProviderError::api(502, "bad gateway from upstream")),
            Some(quota(0, Some(10))),
        )
        .await;
        let token = token_for(app.user);

        let (status, body) = send(app.router, quote_request(Some(&token), valid_body())).await;
        assert_eq!(status, StatusCode::FAILED_DEPENDENCY);
        assert_eq!(body["reason"], "CarrierUnavailable");
        assert!(!body["message"].as_str().unwrap().contains("upstream"));
        assert_eq!(app.subscriptions.quote_count(app.user).await, Some(0));
        assert!(app.history.is_empty().await);
    }

    #[tokio::test]
    async fn history_requires_token() {
        let app = app(Ok(vec![]), None).await;
        let request = Request::builder()
            .uri("/quotes/history")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app.router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn history_lists_most_recent_first() {
        let app = app(Ok(vec![]), None).await;
        let request = ShippingRequest::new(
            "01310-100",
            "04538-133",
            crate::domain::entities::PackageDimensions::new(1.0, 1.0, 1.0, 1.0).unwrap(),
        )
        .unwrap();

        let mut older = QuoteRecord::new(app.user, request.clone(), sedex()).to_stored().unwrap();
        older.created_at = Timestamp::now().sub_secs(3600);
        older.destination = "older".to_string();
        let newer = QuoteRecord::new(app.user, request, vec![]).to_stored().unwrap();
        app.history.save(&older).await.unwrap();
        app.history.save(&newer).await.unwrap();

        let token = token_for(app.user);
        let http = Request::builder()
            .uri("/quotes/history")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app.router, http).await;

        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["id"], newer.id.to_string());
        assert_eq!(entries[1]["destination"], "older");
        assert_eq!(entries[1]["options"][0]["price"], 25.9);
        assert_eq!(entries[1]["package"]["weight"], 1.0);
    }
}
