//! Error taxonomy for the authentication pipeline.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid OTP")]
    InvalidCode,

    #[error("OTP has expired")]
    CodeExpired,

    #[error("Mobile number already registered")]
    AlreadyExists,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Token signing error: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True for failures whose detail must never reach the client.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Persistence(_) | AuthError::Signing(_) | AuthError::Internal(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidInput(_)
            | AuthError::InvalidCode
            | AuthError::CodeExpired
            | AuthError::AlreadyExists => StatusCode::BAD_REQUEST,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Persistence(_) | AuthError::Signing(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Validation and business errors carry their message; internal
        // failures get a generic body, with the detail kept server-side.
        let error = if self.is_internal() {
            "Something went wrong. Please try again.".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { success: false, error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_request() {
        assert_eq!(
            AuthError::invalid_input("mobile required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::InvalidCode.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::CodeExpired.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::AlreadyExists.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            AuthError::not_found("candidate profile").status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_store_failures_are_internal() {
        let err = AuthError::Persistence(sqlx::Error::PoolClosed);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_internal());
    }

    #[test]
    fn test_business_errors_are_not_internal() {
        assert!(!AuthError::InvalidCode.is_internal());
        assert!(!AuthError::AlreadyExists.is_internal());
    }

    #[test]
    fn test_client_messages() {
        // The messages clients see for the 400-class errors are specific.
        assert_eq!(AuthError::InvalidCode.to_string(), "Invalid OTP");
        assert_eq!(AuthError::CodeExpired.to_string(), "OTP has expired");
        assert_eq!(
            AuthError::AlreadyExists.to_string(),
            "Mobile number already registered"
        );
    }
}
