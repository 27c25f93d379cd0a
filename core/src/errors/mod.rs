//! Domain error taxonomy and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{CacheError, RefreshTokenError, TokenError};

use std::time::Duration;
use thiserror::Error;

/// Client-facing error category, one per HTTP status class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    TooManyRequests,
    Conflict,
    Internal,
}

impl ErrorKind {
    /// HTTP status code this category is rendered as
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::TooManyRequests => 429,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }
}

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unauthorized")]
    Unauthorized,

    /// `retry_after` is how long the client should wait before trying again
    #[error("Too many requests, retry after {retry_after:?}")]
    TooManyRequests { retry_after: Duration },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    RefreshToken(#[from] RefreshTokenError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
        }
    }

    pub fn too_many_requests(retry_after: Duration) -> Self {
        DomainError::TooManyRequests { retry_after }
    }

    /// Wait hint for rate limit rejections
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            DomainError::TooManyRequests { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// Classify the error for the presentation layer.
    ///
    /// Every token problem a client can cause collapses to `Unauthorized`;
    /// key material, crypto and cache failures are `Internal`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } => ErrorKind::Validation,
            DomainError::Unauthorized => ErrorKind::Unauthorized,
            DomainError::TooManyRequests { .. } => ErrorKind::TooManyRequests,
            DomainError::Conflict { .. } => ErrorKind::Conflict,
            DomainError::Internal { .. } => ErrorKind::Internal,
            DomainError::Token(TokenError::Signing { .. }) => ErrorKind::Internal,
            DomainError::Token(_) => ErrorKind::Unauthorized,
            DomainError::RefreshToken(RefreshTokenError::Cache(_))
            | DomainError::RefreshToken(RefreshTokenError::Corrupt { .. }) => ErrorKind::Internal,
            DomainError::RefreshToken(_) => ErrorKind::Unauthorized,
            DomainError::Cache(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to show to clients
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Unauthorized => "unauthorized".to_string(),
            ErrorKind::TooManyRequests => "too many requests, retry later".to_string(),
            ErrorKind::Internal => "internal server error".to_string(),
            ErrorKind::Validation | ErrorKind::Conflict => self.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
