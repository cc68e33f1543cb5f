//! # Provider Errors
//!
//! Error types for the external carrier-rate and distance providers.
//!
//! # Examples
//!
//! ```
//! use rotacerta_quotes::infrastructure::providers::error::ProviderError;
//!
//! let error = ProviderError::timeout_with_duration("carrier did not answer", 10_000);
//! assert!(error.is_transient());
//!
//! let error = ProviderError::api(422, r#"{"message":"invalid postal code"}"#);
//! assert_eq!(error.status(), Some(422));
//! assert!(!error.is_transient());
//! ```

use thiserror::Error;

/// Error type for external provider calls.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("provider api error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Request timed out.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// The response could not be understood.
    #[error("provider protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// Local failure before the request was sent.
    #[error("provider internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates an API status error.
    #[must_use]
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status, for API errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for network-level and upstream 5xx/429 failures.
    ///
    /// Nothing retries automatically; this only classifies the failure.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Protocol { .. } | Self::Internal { .. } => false,
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Why a distance could not be resolved.
#[derive(Debug, Clone, Error)]
pub enum DistanceError {
    /// An endpoint could not be geocoded or no route exists.
    #[error("no route between {origin} and {destination}")]
    NotFound {
        /// Origin as given.
        origin: String,
        /// Destination as given.
        destination: String,
    },

    /// Network or provider failure.
    #[error("distance provider unavailable: {0}")]
    Transient(#[from] ProviderError),
}

impl DistanceError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::NotFound {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// Returns true if the same lookup may succeed later.
    ///
    /// A provider that answered but refused the request, e.g. an invalid
    /// API key, is not retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotFound { .. } => false,
            Self::Transient(source) => source.is_transient(),
        }
    }

    /// Short kind label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Transient(_) if self.is_retryable() => "transient",
            Self::Transient(_) => "rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failures_are_transient() {
        assert!(ProviderError::timeout("t").is_transient());
        assert!(ProviderError::connection("c").is_transient());
    }

    #[test]
    fn upstream_5xx_and_429_are_transient() {
        assert!(ProviderError::api(503, "").is_transient());
        assert!(ProviderError::api(429, "").is_transient());
        assert!(!ProviderError::api(400, "").is_transient());
        assert!(!ProviderError::api(401, "").is_transient());
    }

    #[test]
    fn protocol_is_permanent() {
        assert!(!ProviderError::protocol("bad json").is_transient());
    }

    #[test]
    fn display_includes_status_and_body() {
        let display = ProviderError::api(422, "invalid cep").to_string();
        assert!(display.contains("422"));
        assert!(display.contains("invalid cep"));
    }

    #[test]
    fn distance_error_kinds() {
        assert_eq!(DistanceError::not_found("a", "b").kind(), "not_found");
        assert_eq!(
            DistanceError::from(ProviderError::protocol("REQUEST_DENIED")).kind(),
            "rejected"
        );
        assert_eq!(DistanceError::from(ProviderError::api(429, "")).kind(), "transient");
        assert_eq!(
            DistanceError::from(ProviderError::timeout("t")).kind(),
            "transient"
        );
    }
}
