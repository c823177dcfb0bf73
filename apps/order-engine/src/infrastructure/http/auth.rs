//! Bearer-token authentication.
//!
//! Requests carry a JWT with the user's id and role; handlers authenticate
//! against [`JwtAuth`] held in the application state and then check the
//! route's role allowlist.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::shared::UserId;

/// Caller role carried in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office administrator.
    Admin,
    /// Back-office staff.
    Staff,
    /// Shop customer.
    Customer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Staff => f.write_str("staff"),
            Self::Customer => f.write_str("customer"),
        }
    }
}

/// JWT claims as issued by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id.
    pub user_id: i64,
    /// Caller role.
    pub role: Role,
    /// Expiry, seconds since the epoch.
    pub exp: usize,
}

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    /// Authenticated user id.
    pub user_id: UserId,
    /// Caller role.
    pub role: Role,
}

impl AuthUser {
    /// Check the caller against a route's role allowlist.
    ///
    /// # Errors
    ///
    /// [`AuthError::Forbidden`] when the role is not allowed.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AuthError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Authentication failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header.
    #[error("unauthorized: no token provided")]
    MissingToken,
    /// The token failed verification.
    #[error("invalid token")]
    InvalidToken,
    /// The caller's role is not allowed on this route.
    #[error("forbidden: you don't have access to this resource")]
    Forbidden,
}

/// Verifies bearer tokens.
pub struct JwtAuth {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    /// Build a verifier over an HS256 shared secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Authenticate a request from its headers.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingToken`] without a bearer header,
    /// [`AuthError::InvalidToken`] when verification fails.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingToken)?;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser {
            user_id: UserId::new(data.claims.user_id),
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(user_id: i64, role: Role) -> String {
        let claims = Claims {
            user_id,
            role,
            exp: usize::MAX,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn authenticate_accepts_a_valid_token() {
        let auth = JwtAuth::new(SECRET);
        let headers = headers_with(&format!("Bearer {}", token(7, Role::Customer)));

        let user = auth.authenticate(&headers).unwrap();
        assert_eq!(user.user_id, UserId::new(7));
        assert_eq!(user.role, Role::Customer);
    }

    #[test]
    fn authenticate_rejects_missing_header() {
        let auth = JwtAuth::new(SECRET);
        assert_eq!(
            auth.authenticate(&HeaderMap::new()).unwrap_err(),
            AuthError::MissingToken
        );
    }

    #[test]
    fn authenticate_rejects_non_bearer_scheme() {
        let auth = JwtAuth::new(SECRET);
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert_eq!(
            auth.authenticate(&headers).unwrap_err(),
            AuthError::MissingToken
        );
    }

    #[test]
    fn authenticate_rejects_wrong_secret() {
        let auth = JwtAuth::new("other-secret");
        let headers = headers_with(&format!("Bearer {}", token(7, Role::Customer)));
        assert_eq!(
            auth.authenticate(&headers).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn require_role_checks_the_allowlist() {
        let user = AuthUser {
            user_id: UserId::new(1),
            role: Role::Staff,
        };
        assert!(user.require_role(&[Role::Admin, Role::Staff]).is_ok());
        assert_eq!(
            user.require_role(&[Role::Customer]).unwrap_err(),
            AuthError::Forbidden
        );
    }

    #[test]
    fn role_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let parsed: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(parsed, Role::Customer);
    }
}
