//! User repository trait defining the interface for account lookups.
//!
//! Persistence is owned by the infrastructure layer; the session flows only
//! need to find an account, create one and replace its password hash.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by normalised email
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No account with that email
    /// * `Err(DomainError)` - Storage failure
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Persist a new user
    ///
    /// Fails with `DomainError::Conflict` if the email is already registered.
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Replace the stored bcrypt hash for `id`
    ///
    /// Fails with `DomainError::Validation` if the user does not exist.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError>;
}
