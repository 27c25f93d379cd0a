//! Translation of domain failures into HTTP responses
//!
//! Token and refresh failures all render as a bare `401 unauthorized`; the
//! precise reason is only logged. Internal failures never leak their
//! message to the client.

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use std::fmt;
use std::time::Duration;

use sg_core::errors::{DomainError, ErrorKind};
use sg_shared::errors::{error_codes, ErrorResponse};

pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by route handlers
#[derive(Debug)]
pub enum ApiError {
    /// A failure reported by the session service
    Domain(DomainError),
    /// The request body failed validation
    InvalidRequest(validator::ValidationErrors),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Domain(e) => write!(f, "{}", e),
            ApiError::InvalidRequest(e) => write!(f, "invalid request: {}", e),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        ApiError::Domain(error)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::InvalidRequest(errors)
    }
}

/// Error code placed in the `error` field for each kind
pub fn error_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => error_codes::VALIDATION_ERROR,
        ErrorKind::Unauthorized => error_codes::UNAUTHORIZED,
        ErrorKind::TooManyRequests => error_codes::RATE_LIMIT_EXCEEDED,
        ErrorKind::Conflict => error_codes::CONFLICT,
        ErrorKind::Internal => error_codes::INTERNAL_ERROR,
    }
}

/// `Retry-After` value for `wait`: whole seconds rounded up, at least 1
pub fn retry_after_secs(wait: Duration) -> String {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1).to_string()
}

/// Render a domain error, logging the detail the client does not see
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    let kind = error.kind();
    match kind {
        ErrorKind::Internal => tracing::error!(error = %error, "Request failed"),
        ErrorKind::Unauthorized => tracing::debug!(error = %error, "Request unauthorized"),
        _ => tracing::debug!(error = %error, "Request rejected"),
    }

    let body = ErrorResponse::new(error_code(kind), error.public_message());
    let status = StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = HttpResponse::build(status);
    if let Some(wait) = error.retry_after() {
        response.insert_header((header::RETRY_AFTER, retry_after_secs(wait)));
    }
    response.json(body)
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => StatusCode::from_u16(e.kind().status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Domain(e) => domain_error_response(e),
            ApiError::InvalidRequest(errors) => {
                let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
                fields.sort_unstable();
                HttpResponse::BadRequest().json(
                    ErrorResponse::new(error_codes::VALIDATION_ERROR, "invalid request")
                        .add_detail("fields", fields),
                )
            }
        }
    }
}
