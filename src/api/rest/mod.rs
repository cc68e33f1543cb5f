//! # REST API
//!
//! HTTP endpoints using axum.
//!
//! # Endpoints
//!
//! - `POST /quotes/calculate` - Quote a shipment (bearer token required)
//! - `GET /quotes/history` - The caller's past quotes, most recent first
//! - `GET /health` - Liveness probe
//!
//! # Usage
//!
//! ```ignore
//! use rotacerta_quotes::api::rest::{create_router, AppState};
//!
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;

pub use auth::{AuthenticatedUser, Claims, JwtAuthenticator, MaybePrincipal};
pub use error::{ApiError, ApiResult, ErrorBody};
pub use handlers::{
    AppState, HealthResponse, PackageDto, QuoteHistoryDto, QuoteRequestDto, QuoteResponse,
    ShippingOptionDto,
};
pub use routes::create_router;
