//! API error and response envelope.
//!
//! Every handler returns either `ApiResponse<T>` with `success: true` or an
//! [`ApiError`] that renders as a structured error payload. The mapping from
//! the core's error taxonomy to transport status codes lives here and
//! nowhere else, so it stays deterministic.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use account_core::AccountError;

/// Uniform response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

/// Error payload identifying the failure kind.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiErrorBody {
    /// Stable machine-readable failure kind.
    #[schema(example = "username_taken")]
    pub code: String,
    /// Human-readable message.
    #[schema(example = "username already exists")]
    pub message: String,
}

/// Wrap a successful payload in the response envelope.
pub fn api_success<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    }
}

/// A failed request: transport status plus the structured error body.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_failed", message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized!")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match &err {
            AccountError::UsernameTaken => {
                Self::new(StatusCode::BAD_REQUEST, "username_taken", err.to_string())
            }
            AccountError::EmailTaken => {
                Self::new(StatusCode::BAD_REQUEST, "email_taken", err.to_string())
            }
            AccountError::EmptyPassword => {
                Self::new(StatusCode::BAD_REQUEST, "empty_password", err.to_string())
            }
            AccountError::Validation(_) => {
                Self::new(StatusCode::BAD_REQUEST, "validation_failed", err.to_string())
            }
            AccountError::BadCredentials => {
                Self::new(StatusCode::UNAUTHORIZED, "bad_credentials", "Unauthorized!")
            }
            AccountError::TokenVerification(_) => {
                Self::new(StatusCode::UNAUTHORIZED, "invalid_token", "Unauthorized!")
            }
            AccountError::UserNotFound => {
                Self::new(StatusCode::NOT_FOUND, "user_not_found", err.to_string())
            }
            AccountError::EventNotFound => {
                Self::new(StatusCode::NOT_FOUND, "event_not_found", err.to_string())
            }
            AccountError::Hashing(_) => {
                tracing::error!(error = %err, "hashing primitive failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "hashing_failed",
                    "password encryption failed",
                )
            }
            AccountError::Store(_) => {
                tracing::error!(error = %err, "store backend failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store_error",
                    "internal error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: ApiResponse<()> = ApiResponse {
            success: false,
            data: None,
            error: Some(ApiErrorBody {
                code: self.code.to_string(),
                message: self.message,
            }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_stable_status_codes() {
        let cases = [
            (AccountError::UsernameTaken, StatusCode::BAD_REQUEST),
            (AccountError::EmailTaken, StatusCode::BAD_REQUEST),
            (AccountError::EmptyPassword, StatusCode::BAD_REQUEST),
            (
                AccountError::Validation("x is required".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (AccountError::BadCredentials, StatusCode::UNAUTHORIZED),
            (AccountError::UserNotFound, StatusCode::NOT_FOUND),
            (AccountError::EventNotFound, StatusCode::NOT_FOUND),
            (
                AccountError::Store("down".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn error_body_is_structured() {
        let err = ApiError::from(AccountError::UsernameTaken);
        assert_eq!(err.code, "username_taken");
        assert_eq!(err.message, "username already exists");
    }
}
