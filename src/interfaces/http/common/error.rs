//! Translation of application errors into HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::application::{ParameterError, PropertyMappingError, ShapingError};
use crate::domain::DomainError;

/// Message returned for every unexpected server-side failure.
pub const UNEXPECTED_FAULT: &str = "An unexpected fault happened. Try again later.";

/// Application-level error type for HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not acceptable: {0}")]
    NotAcceptable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<ParameterError> for AppError {
    fn from(e: ParameterError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<PropertyMappingError> for AppError {
    fn from(e: PropertyMappingError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<ShapingError> for AppError {
    fn from(e: ShapingError) -> Self {
        match e {
            ShapingError::UnknownField(_) => Self::BadRequest(e.to_string()),
            ShapingError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

fn unexpected(detail: &str) -> (StatusCode, String) {
    error!(target: "global_exception_logger", error = %detail, "Unexpected fault");
    (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_FAULT.to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Domain(domain) => match domain {
                DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, domain.to_string()),
                DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                DomainError::Paging(e) => (StatusCode::BAD_REQUEST, e.to_string()),
                DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                DomainError::Database(msg) => unexpected(msg),
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotAcceptable(msg) => (StatusCode::NOT_ACCEPTABLE, msg.clone()),
            AppError::Internal(msg) => unexpected(msg),
        };

        (status, Json(ApiResponse::error(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::PagingError;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn domain_errors_map_to_status_codes() {
        assert_eq!(
            status_of(DomainError::not_found("Author", "id", 1).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::Conflict("x".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::Paging(PagingError::InvalidPageSize(0)).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::Database("disk I/O".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn query_errors_are_bad_requests() {
        assert_eq!(
            status_of(ShapingError::UnknownField("x".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(PropertyMappingError::UnknownProperty("x".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::NotAcceptable("text/csv".into())),
            StatusCode::NOT_ACCEPTABLE
        );
    }
}
