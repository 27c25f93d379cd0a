//! Tests for error classification

use std::time::Duration;

use crate::errors::{CacheError, DomainError, ErrorKind, RefreshTokenError, TokenError};

#[test]
fn test_direct_variants_map_to_their_kind() {
    assert_eq!(DomainError::validation("bad").kind(), ErrorKind::Validation);
    assert_eq!(DomainError::Unauthorized.kind(), ErrorKind::Unauthorized);
    assert_eq!(
        DomainError::too_many_requests(Duration::from_secs(1)).kind(),
        ErrorKind::TooManyRequests
    );
    assert_eq!(
        DomainError::Conflict { message: "taken".into() }.kind(),
        ErrorKind::Conflict
    );
    assert_eq!(DomainError::internal("boom").kind(), ErrorKind::Internal);
}

#[test]
fn test_retry_after_only_on_rate_limit_errors() {
    let limited = DomainError::too_many_requests(Duration::from_secs(60));
    assert_eq!(limited.retry_after(), Some(Duration::from_secs(60)));
    assert_eq!(DomainError::Unauthorized.retry_after(), None);
}

#[test]
fn test_token_failures_are_unauthorized_except_signing() {
    for err in [
        TokenError::Malformed,
        TokenError::InvalidSignature,
        TokenError::Expired,
        TokenError::Decryption { reason: "tag".into() },
    ] {
        assert_eq!(DomainError::from(err).kind(), ErrorKind::Unauthorized);
    }

    let signing = DomainError::from(TokenError::Signing { reason: "no key".into() });
    assert_eq!(signing.kind(), ErrorKind::Internal);
}

#[test]
fn test_refresh_failures() {
    for err in [
        RefreshTokenError::NotFound,
        RefreshTokenError::Revoked,
        RefreshTokenError::Expired,
        RefreshTokenError::RotationAborted { reason: "cache down".into() },
    ] {
        assert_eq!(DomainError::from(err).kind(), ErrorKind::Unauthorized);
    }

    let cache = RefreshTokenError::Cache(CacheError::unavailable("timeout"));
    assert_eq!(DomainError::from(cache).kind(), ErrorKind::Internal);
}

#[test]
fn test_cache_errors_are_internal() {
    let err = DomainError::from(CacheError::unavailable("connection refused"));
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.public_message(), "internal server error");
}

#[test]
fn test_public_message_is_uniform_for_token_problems() {
    let expired = DomainError::from(TokenError::Expired);
    let forged = DomainError::from(TokenError::InvalidSignature);
    let revoked = DomainError::from(RefreshTokenError::Revoked);

    assert_eq!(expired.public_message(), "unauthorized");
    assert_eq!(forged.public_message(), expired.public_message());
    assert_eq!(revoked.public_message(), expired.public_message());
}

#[test]
fn test_status_codes() {
    assert_eq!(ErrorKind::Validation.status_code(), 400);
    assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
    assert_eq!(ErrorKind::TooManyRequests.status_code(), 429);
    assert_eq!(ErrorKind::Conflict.status_code(), 409);
    assert_eq!(ErrorKind::Internal.status_code(), 500);
}
