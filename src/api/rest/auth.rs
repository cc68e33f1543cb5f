//! # Bearer Authentication
//!
//! Validates HS256 JWTs issued by the account service and turns them into
//! an explicit principal for the handlers.
//!
//! - No `Authorization` header: no principal. The quota guard then refuses
//!   with `Unauthenticated`.
//! - A header that is not `Bearer <token>`, or a token that fails signature,
//!   expiry, issuer or subject checks: 401 `Unauthenticated` with detail `InvalidToken`.

use crate::api::rest::error::ApiError;
use crate::domain::value_objects::UserId;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// User email, if the issuer includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiry, seconds since the epoch.
    pub exp: u64,
    /// Issued at, seconds since the epoch.
    #[serde(default)]
    pub iat: u64,
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User id.
    pub user_id: UserId,
    /// Email, if present in the token.
    pub email: Option<String>,
}

/// Token verifier.
#[derive(Clone)]
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("issuer", &self.validation.iss)
            .finish_non_exhaustive()
    }
}

impl JwtAuthenticator {
    /// Creates a verifier for tokens signed with `secret`.
    ///
    /// When `issuer` is set, tokens must carry a matching `iss` claim.
    #[must_use]
    pub fn new(secret: &[u8], issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verifies a raw token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidToken` if the token does not verify or its
    /// subject is not a user id.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, ApiError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = ?e.kind(), "token rejected");
            ApiError::InvalidToken
        })?;
        let user_id = data
            .claims
            .sub
            .parse::<UserId>()
            .map_err(|_| ApiError::InvalidToken)?;
        Ok(AuthenticatedUser {
            user_id,
            email: data.claims.email,
        })
    }
}

/// Extracts the token from an `Authorization` header value.
fn extract_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// The caller, if a bearer token was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaybePrincipal(pub Option<AuthenticatedUser>);

impl MaybePrincipal {
    /// The caller's user id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

impl<S> FromRequestParts<S> for MaybePrincipal
where
    Arc<JwtAuthenticator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Self(None));
        };
        let header = value.to_str().map_err(|_| ApiError::InvalidToken)?;
        let token = extract_token(header).ok_or(ApiError::InvalidToken)?;
        let authenticator = Arc::<JwtAuthenticator>::from_ref(state);
        authenticator.verify(token).map(|user| Self(Some(user)))
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn authenticator() -> JwtAuthenticator {
        JwtAuthenticator::new(SECRET, Some(ISSUER))
    }

    #[test]
    fn valid_token_yields_principal() {
        let user = UserId::new_v4();
        let principal = authenticator().verify(&token_for(user)).unwrap();
        assert_eq!(principal.user_id, user);
        assert_eq!(principal.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn expired_token_rejected() {
        let now = now_secs();
        let token = sign(
            &Claims {
                sub: UserId::new_v4().to_string(),
                email: None,
                exp: now - 3600,
                iat: now - 7200,
                iss: Some(ISSUER.to_string()),
            },
            SECRET,
        );
        assert!(matches!(authenticator().verify(&token), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn wrong_secret_rejected() {
        let user = UserId::new_v4();
        let now = now_secs();
        let token = sign(
            &Claims {
                sub: user.to_string(),
                email: None,
                exp: now + 60,
                iat: now,
                iss: Some(ISSUER.to_string()),
            },
            b"another-secret-another-secret-xx",
        );
        assert!(authenticator().verify(&token).is_err());
    }

    #[test]
    fn wrong_issuer_rejected() {
        let now = now_secs();
        let token = sign(
            &Claims {
                sub: UserId::new_v4().to_string(),
                email: None,
                exp: now + 60,
                iat: now,
                iss: Some("someone-else".to_string()),
            },
            SECRET,
        );
        assert!(authenticator().verify(&token).is_err());
    }

    #[test]
    fn non_uuid_subject_rejected() {
        let now = now_secs();
        let token = sign(
            &Claims {
                sub: "ana".to_string(),
                email: None,
                exp: now + 60,
                iat: now,
                iss: Some(ISSUER.to_string()),
            },
            SECRET,
        );
        assert!(matches!(authenticator().verify(&token), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn garbage_rejected() {
        assert!(authenticator().verify("not.a.jwt").is_err());
    }

    #[test]
    fn bearer_prefix_required() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("Basic abc"), None);
        assert_eq!(extract_token("Bearer "), None);
    }
}
