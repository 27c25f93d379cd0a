//! Unit tests for the user entity

use crate::domain::entities::identity::Identity;
use crate::domain::entities::user::{normalize_email, User, ROLE_USER};

#[test]
fn test_new_user_normalizes_email() {
    let user = User::new("  Alice@Example.COM ", "hash".into(), ROLE_USER);
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.created_at, user.updated_at);
}

#[test]
fn test_set_password_hash_bumps_updated_at() {
    let mut user = User::new("bob@example.com", "old".into(), ROLE_USER);
    let before = user.updated_at;

    user.set_password_hash("new".into());
    assert_eq!(user.password_hash, "new");
    assert!(user.updated_at >= before);
}

#[test]
fn test_identity_from_user() {
    let user = User::new("carol@example.com", "hash".into(), "admin");
    let identity = Identity::from(&user);

    assert_eq!(identity.subject_id, user.id);
    assert_eq!(identity.email, "carol@example.com");
    assert_eq!(identity.role, "admin");
}

#[test]
fn test_normalize_email() {
    assert_eq!(normalize_email("\tX@Y.z\n"), "x@y.z");
}
