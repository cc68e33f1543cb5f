//! # API Errors
//!
//! Maps application failures onto HTTP responses.
//!
//! Every failure body has the same shape. `detail` is present only when the
//! reason has a finer-grained cause:
//!
//! ```text
//! {"reason": "QuotaDenied", "detail": "QuotaExceeded",
//!  "message": "quote limit reached for the current plan"}
//! ```
//!
//! | Reason | Detail | Status |
//! |--------|--------|--------|
//! | `Validation` | `InvalidBody` for unparseable JSON | 400 |
//! | `Unauthenticated` | `InvalidToken` for a rejected token | 401 |
//! | `QuotaDenied` | `NoActiveSubscription`, `QuotaExceeded` | 403 |
//! | `CarrierUnavailable` | | 424 |
//! | `Internal` | | 500 |

use crate::application::error::ApplicationError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Failure body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable reason.
    pub reason: String,
    /// Finer-grained cause within `reason`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Human-readable message.
    pub message: String,
}

/// HTTP-facing error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Use-case failure.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// The body was not valid JSON for the endpoint.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The bearer token was malformed, forged or expired.
    #[error("invalid token")]
    InvalidToken,
}

impl ApiError {
    /// Status code for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Application(e) => match e {
                ApplicationError::Validation(_) => StatusCode::BAD_REQUEST,
                ApplicationError::Unauthenticated => StatusCode::UNAUTHORIZED,
                ApplicationError::QuotaDenied(_) => StatusCode::FORBIDDEN,
                ApplicationError::CarrierUnavailable(_) => StatusCode::FAILED_DEPENDENCY,
                ApplicationError::Repository(_) | ApplicationError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Response body for this error. Provider and storage details are not included.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        let (reason, detail, message) = match self {
            Self::InvalidBody(text) => ("Validation", Some("InvalidBody"), text.clone()),
            Self::InvalidToken => (
                "Unauthenticated",
                Some("InvalidToken"),
                "invalid or expired token".to_string(),
            ),
            Self::Application(e) => {
                let message = match e {
                    ApplicationError::Validation(detail) => detail.clone(),
                    ApplicationError::Unauthenticated => "authentication required".to_string(),
                    ApplicationError::QuotaDenied(denial) => denial.message().to_string(),
                    ApplicationError::CarrierUnavailable(_) => {
                        "carrier rates are temporarily unavailable".to_string()
                    }
                    ApplicationError::Repository(_) | ApplicationError::Internal(_) => {
                        "internal server error".to_string()
                    }
                };
                (e.reason_code(), e.detail(), message)
            }
        };
        ErrorBody {
            reason: reason.to_string(),
            detail: detail.map(str::to_string),
            message,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::services::QuotaDenial;
    use crate::infrastructure::persistence::RepositoryError;

    #[test]
    fn status_mapping() {
        let cases = [
            (ApiError::InvalidBody("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidToken, StatusCode::UNAUTHORIZED),
            (ApplicationError::validation("x").into(), StatusCode::BAD_REQUEST),
            (ApplicationError::Unauthenticated.into(), StatusCode::UNAUTHORIZED),
            (
                ApplicationError::QuotaDenied(QuotaDenial::QuotaExceeded).into(),
                StatusCode::FORBIDDEN,
            ),
            (
                ApplicationError::carrier_unavailable("timeout").into(),
                StatusCode::FAILED_DEPENDENCY,
            ),
            (
                ApplicationError::internal("boom").into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err}");
        }
    }

    #[test]
    fn carrier_detail_is_not_exposed() {
        let err: ApiError =
            ApplicationError::carrier_unavailable("api error 502: upstream secret").into();
        let body = err.body();
        assert_eq!(body.reason, "CarrierUnavailable");
        assert_eq!(body.detail, None);
        assert!(!body.message.contains("secret"));
    }

    #[test]
    fn repository_detail_is_not_exposed() {
        let err: ApiError =
            ApplicationError::Repository(RepositoryError::query("relation quotes missing")).into();
        let body = err.body();
        assert_eq!(body.reason, "Internal");
        assert_eq!(body.message, "internal server error");
    }

    #[test]
    fn quota_reason_is_specific() {
        let err: ApiError = ApplicationError::QuotaDenied(QuotaDenial::NoActiveSubscription).into();
        let body = err.body();
        assert_eq!(body.reason, "QuotaDenied");
        assert_eq!(body.detail.as_deref(), Some("NoActiveSubscription"));
    }

    #[test]
    fn carrier_timeout_is_424_carrier_unavailable() {
        let err = ApiError::from(ApplicationError::carrier_unavailable("timed out after 10000ms"));
        assert_eq!(err.status(), StatusCode::FAILED_DEPENDENCY);
        assert_eq!(err.body().reason, "CarrierUnavailable");
    }

    #[test]
    fn detail_is_omitted_when_absent() {
        let err = ApiError::from(ApplicationError::carrier_unavailable("t"));
        let value = serde_json::to_value(err.body()).unwrap();
        assert!(value.get("detail").is_none());
    }
}
