//! # Application Errors
//!
//! Error taxonomy for the quoting use cases.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Validation(String)            - malformed request
//! ├── Unauthenticated               - no authenticated principal
//! ├── QuotaDenied(QuotaDenial)      - inactive, expired or exhausted subscription
//! ├── CarrierUnavailable(String)    - carrier failed or timed out
//! ├── Repository(RepositoryError)   - storage read failed
//! └── Internal(String)              - anything else
//! ```
//!
//! Distance failures never surface here; they only remove local options.
//! History write and quota increment failures are logged, not returned.
//!
//! # Examples
//!
//! ```
//! use rotacerta_quotes::application::error::ApplicationError;
//! use rotacerta_quotes::domain::services::QuotaDenial;
//!
//! let err = ApplicationError::from(QuotaDenial::QuotaExceeded);
//! assert_eq!(err.reason_code(), "QuotaDenied");
//! assert_eq!(err.detail(), Some("QuotaExceeded"));
//!
//! let err = ApplicationError::carrier_unavailable("timed out after 10000ms");
//! assert_eq!(err.reason_code(), "CarrierUnavailable");
//! ```

use crate::domain::errors::DomainError;
use crate::domain::services::QuotaDenial;
use crate::infrastructure::persistence::RepositoryError;
use crate::infrastructure::providers::ProviderError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// No authenticated user.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The subscription does not allow quoting.
    #[error("quota denied: {0}")]
    QuotaDenied(QuotaDenial),

    /// Carrier rates could not be obtained.
    #[error("carrier unavailable: {0}")]
    CarrierUnavailable(String),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a carrier unavailable error.
    #[must_use]
    pub fn carrier_unavailable(message: impl Into<String>) -> Self {
        Self::CarrierUnavailable(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable machine-readable reason code.
    #[must_use]
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation",
            Self::Unauthenticated => "Unauthenticated",
            Self::QuotaDenied(_) => "QuotaDenied",
            Self::CarrierUnavailable(_) => "CarrierUnavailable",
            Self::Repository(_) | Self::Internal(_) => "Internal",
        }
    }

    /// Finer-grained reason within the category, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&'static str> {
        match self {
            Self::QuotaDenied(denial) => Some(denial.reason_code()),
            _ => None,
        }
    }

    /// Returns true if the error may be shown to the caller verbatim.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Repository(_) | Self::Internal(_))
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<DomainError> for ApplicationError {
    fn from(error: DomainError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<QuotaDenial> for ApplicationError {
    fn from(denial: QuotaDenial) -> Self {
        match denial {
            QuotaDenial::NotAuthenticated => Self::Unauthenticated,
            other => Self::QuotaDenied(other),
        }
    }
}

impl From<ProviderError> for ApplicationError {
    fn from(error: ProviderError) -> Self {
        Self::CarrierUnavailable(error.to_string())
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
