use std::time::Duration;
use tokio::time::Instant;

use crate::errors::DomainError;
use crate::services::auth::LoginAttemptGuard;

#[test]
fn test_sixth_attempt_is_rejected() {
    let guard = LoginAttemptGuard::with_defaults();
    let t0 = Instant::now();

    for _ in 0..5 {
        assert!(guard.check_at("10.0.0.1", t0).is_ok());
    }
    assert!(matches!(
        guard.check_at("10.0.0.1", t0),
        Err(DomainError::TooManyRequests { .. })
    ));

    // other clients are unaffected
    assert!(guard.check_at("10.0.0.2", t0).is_ok());
}

#[test]
fn test_rejection_carries_time_to_next_attempt() {
    let guard = LoginAttemptGuard::with_defaults();
    let t0 = Instant::now();

    for _ in 0..5 {
        guard.check_at("client", t0).unwrap();
    }
    // one attempt comes back every 60 s
    let err = guard.check_at("client", t0).unwrap_err();
    let wait = err.retry_after().unwrap();
    assert!(wait > Duration::from_secs(59) && wait < Duration::from_millis(60_001));

    let err = guard.check_at("client", t0 + Duration::from_secs(45)).unwrap_err();
    let wait = err.retry_after().unwrap();
    assert!(wait > Duration::from_secs(14) && wait < Duration::from_millis(15_001));
}

#[test]
fn test_reset_restores_attempts() {
    let guard = LoginAttemptGuard::with_defaults();
    let t0 = Instant::now();

    for _ in 0..5 {
        guard.check_at("client", t0).unwrap();
    }
    guard.reset("client");

    for _ in 0..5 {
        assert!(guard.check_at("client", t0).is_ok());
    }
}

#[test]
fn test_attempts_refill_over_the_window() {
    let guard = LoginAttemptGuard::with_defaults();
    let t0 = Instant::now();

    for _ in 0..5 {
        guard.check_at("client", t0).unwrap();
    }
    assert!(guard.check_at("client", t0 + Duration::from_secs(30)).is_err());
    // one attempt every 60 s
    assert!(guard.check_at("client", t0 + Duration::from_secs(61)).is_ok());
    assert!(guard.check_at("client", t0 + Duration::from_secs(62)).is_err());
}

#[test]
fn test_registry_is_shared_with_sweeper() {
    let guard = LoginAttemptGuard::with_defaults();
    guard.check("client").unwrap();

    assert_eq!(guard.registry().len(), 1);
    assert_eq!(guard.registry().available_at("client", Instant::now()).floor(), 4.0);
}
