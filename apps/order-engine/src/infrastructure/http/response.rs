//! Response envelope and error mapping.
//!
//! Every endpoint answers `{code, message, data?}` with `1` for success, `0`
//! for handled-but-empty results and auth denials, and `-1` for errors. Error
//! kinds map to HTTP status codes here, exactly once.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::ordering::{ErrorKind, OrderError};

use super::auth::AuthError;

/// The `{code, message, data?}` response body.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T>
where
    T: Serialize,
{
    /// `1` success, `0` handled/empty or denied, `-1` error.
    pub code: i32,
    /// Human-readable outcome.
    pub message: String,
    /// Payload, absent on failures and empty results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T>
where
    T: Serialize,
{
    /// Successful result with a payload.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            code: 1,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Handled request with nothing to return.
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            code: 0,
            message: message.into(),
            data: None,
        }
    }
}

impl Envelope<()> {
    /// Server-side or business failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: -1,
            message: message.into(),
            data: None,
        }
    }

    /// Authentication or authorization denial.
    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            code: 0,
            message: message.into(),
            data: None,
        }
    }
}

/// Failure leaving a handler, converted into an enveloped response.
#[derive(Debug)]
pub enum ApiError {
    /// A domain failure with a stable kind.
    Order(OrderError),
    /// An authentication or authorization failure.
    Auth(AuthError),
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        Self::Order(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

/// The one place error kinds become transport status codes.
const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Order(err) => {
                let status = status_for(err.kind());
                if matches!(err.kind(), ErrorKind::Internal) {
                    tracing::error!(error = %err, "request failed");
                }
                (status, Json(Envelope::error(err.to_string()))).into_response()
            }
            Self::Auth(err) => {
                let status = match err {
                    AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                    AuthError::Forbidden => StatusCode::FORBIDDEN,
                };
                (status, Json(Envelope::denied(err.to_string()))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::OrderId;

    #[test]
    fn success_envelope_carries_data() {
        let body = serde_json::to_value(Envelope::success("ok", vec![1, 2])).unwrap();
        assert_eq!(body["code"], 1);
        assert_eq!(body["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn empty_envelope_omits_data() {
        let body = serde_json::to_value(Envelope::<()>::empty("no cart found")).unwrap();
        assert_eq!(body["code"], 0);
        assert!(body.get("data").is_none());
    }

    #[test]
    fn error_envelope_is_minus_one() {
        let body = serde_json::to_value(Envelope::error("boom")).unwrap();
        assert_eq!(body["code"], -1);
    }

    #[test]
    fn kinds_map_to_expected_statuses() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorKind::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_error_becomes_404() {
        let response = ApiError::Order(OrderError::OrderNotFound {
            order_id: OrderId::new(9),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn auth_errors_become_401_and_403() {
        assert_eq!(
            ApiError::Auth(AuthError::MissingToken)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Auth(AuthError::Forbidden).into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
