// Error handling module for the Company API
// Provides the error taxonomy shared by storage, resolvers and HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

/// Main error type for the API
/// All resolvers, storage adapters and handlers return Result<T, ApiError>
///
/// Every variant owns its message, so each failure builds a fresh value.
/// The HTTP boundary is the only place where a variant is turned into a
/// status code and a `{code, message}` body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Request body could not be decoded or violated a field constraint
    #[error("{0}")]
    InvalidBody(String),

    /// Identifier is not a well-formed UUID
    #[error("{0}")]
    InvalidUuid(String),

    /// Company identifier missing from the path
    #[error("company ID is required")]
    CompanyIdRequired,

    #[error("{0}")]
    UserNotFound(String),

    #[error("{0}")]
    UserAlreadyExists(String),

    #[error("{0}")]
    CompanyNotFound(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidToken(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    TokenExpired(String),

    /// Authorization header or bearer token missing
    #[error("{0}")]
    TokenNotFound(String),

    /// Anything the service cannot attribute to the client
    /// The underlying message is kept for logs
    #[error("{0}")]
    InternalServer(String),

    /// The event record could not be persisted
    #[error("{0}")]
    EventCreation(String),
}

/// Consistent error response structure
///
/// Serialized as `{"code": "...", "message": "..."}` for every failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "INVALID_BODY", "TOKEN_EXPIRED")
    #[schema(example = "INVALID_BODY")]
    pub code: String,

    /// Human-readable error message
    #[schema(example = "name is required")]
    pub message: String,
}

impl ApiError {
    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidBody(_) => "INVALID_BODY",
            ApiError::InvalidUuid(_) => "INVALID_UUID",
            ApiError::CompanyIdRequired => "COMPANY_ID_REQUIRED",
            ApiError::UserNotFound(_) => "USER_NOT_FOUND",
            ApiError::UserAlreadyExists(_) => "USER_ALREADY_EXISTS",
            ApiError::CompanyNotFound(_) => "COMPANY_NOT_FOUND",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::InvalidToken(_) => "INVALID_TOKEN",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::TokenExpired(_) => "TOKEN_EXPIRED",
            ApiError::TokenNotFound(_) => "TOKEN_NOT_FOUND",
            ApiError::InternalServer(_) => "INTERNAL_SERVER_ERROR",
            ApiError::EventCreation(_) => "CREATING_EVENT",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_)
            | ApiError::InvalidUuid(_)
            | ApiError::CompanyIdRequired
            | ApiError::UserNotFound(_)
            | ApiError::UserAlreadyExists(_)
            | ApiError::CompanyNotFound(_)
            | ApiError::TokenNotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials
            | ApiError::InvalidToken(_)
            | ApiError::Unauthorized
            | ApiError::TokenExpired(_) => StatusCode::UNAUTHORIZED,
            ApiError::InternalServer(_) | ApiError::EventCreation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn invalid_uuid(id: &str) -> Self {
        ApiError::InvalidUuid(format!("invalid UUID '{}'", id))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::InternalServer(message.into())
    }

    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logs once per failure: warn for client errors, error for 500-level errors.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.code(), "{}", self);
        } else {
            warn!(code = self.code(), "{}", self);
        }

        (
            status,
            ErrorResponse {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

/// Convert sqlx errors to ApiError
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::InternalServer(format!("storage error: {}", error))
    }
}

/// Result type alias
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(ApiError::InvalidBody("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::invalid_uuid("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::CompanyIdRequired.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UserNotFound("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UserAlreadyExists("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::CompanyNotFound("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::TokenNotFound("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::TokenExpired("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::EventCreation("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_each_error_carries_its_own_message() {
        let first = ApiError::CompanyNotFound("company with id 'a' not found".into());
        let second = ApiError::CompanyNotFound("company with id 'b' not found".into());
        assert_ne!(first.to_string(), second.to_string());
        assert_eq!(first.code(), second.code());
    }

    #[tokio::test]
    async fn test_response_body_has_code_and_message() {
        let response = ApiError::TokenNotFound("missing Authorization header".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "TOKEN_NOT_FOUND");
        assert_eq!(body["message"], "missing Authorization header");
        assert_eq!(body.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_sqlx_errors_become_internal() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
        assert!(err.to_string().contains("storage error"));
    }
}
