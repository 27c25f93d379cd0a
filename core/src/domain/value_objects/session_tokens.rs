//! Token pair handed to clients after login or refresh.

use serde::{Deserialize, Serialize};

/// Access and refresh credentials issued together
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokens {
    /// Signed access token for API authentication
    pub access_token: String,

    /// Opaque refresh token for obtaining a new pair
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Always "Bearer"
    pub token_type: String,
}

impl SessionTokens {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}
