//! bcrypt helpers run off the async executor

use crate::errors::DomainError;

/// Hash `password` with bcrypt at `cost`
pub async fn hash_password(password: &str, cost: u32) -> Result<String, DomainError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| DomainError::internal(format!("password hashing task failed: {}", e)))?
        .map_err(|e| DomainError::internal(format!("password hashing failed: {}", e)))
}

/// Check `password` against a bcrypt `hash`
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, DomainError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| DomainError::internal(format!("password verification task failed: {}", e)))?
        .map_err(|e| DomainError::internal(format!("stored password hash is invalid: {}", e)))
}
