//! Authenticated principal carried inside access tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Who a request acts on behalf of.
///
/// Serialized to JSON and encrypted into the `data` claim; never appears in
/// plaintext inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: Uuid,
    pub email: String,
    pub role: String,
}

impl Identity {
    pub fn new(subject_id: Uuid, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            subject_id,
            email: email.into(),
            role: role.into(),
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            subject_id: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}
