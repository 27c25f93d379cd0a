//! User entity as seen by the authentication flows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// Registered account with a bcrypt password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Normalised (trimmed, lower-case) email address
    pub email: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    /// Role name copied into issued identities
    pub role: String,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance
    pub fn new(email: &str, password_hash: String, role: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash,
            role: role.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the password hash and bump `updated_at`
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

/// Canonical form used for lookups and cooldown keys
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
