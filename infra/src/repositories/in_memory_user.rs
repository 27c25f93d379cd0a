//! Process-local `UserRepository`
//!
//! Accounts live in a map keyed by id with a secondary email index. Nothing
//! is persisted; the binary seeds a bootstrap account at startup.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use sg_core::domain::entities::user::{normalize_email, User};
use sg_core::errors::DomainError;
use sg_core::repositories::UserRepository;
use sg_core::services::auth::hash_password;

#[derive(Default)]
struct Accounts {
    by_id: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

/// In-memory user repository
#[derive(Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<Accounts>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `password` and register a new account.
    ///
    /// # Errors
    /// * `DomainError::Conflict` - the email is already registered
    /// * `DomainError::Internal` - bcrypt failed
    pub async fn seed_user(
        &self,
        email: &str,
        password: &str,
        role: &str,
        bcrypt_cost: u32,
    ) -> Result<User, DomainError> {
        let hash = hash_password(password, bcrypt_cost).await?;
        let user = self.create(User::new(email, hash, role)).await?;
        info!(user_id = %user.id, role = %user.role, "Seeded user account");
        Ok(user)
    }

    /// Number of registered accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let accounts = self.accounts.read().await;
        let user = accounts
            .by_email
            .get(&normalize_email(email))
            .and_then(|id| accounts.by_id.get(id))
            .cloned();
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.accounts.read().await.by_id.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut accounts = self.accounts.write().await;
        if accounts.by_email.contains_key(&user.email) {
            return Err(DomainError::Conflict {
                message: "email is already registered".to_string(),
            });
        }

        accounts.by_email.insert(user.email.clone(), user.id);
        accounts.by_id.insert(user.id, user.clone());
        debug!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let user = accounts
            .by_id
            .get_mut(&id)
            .ok_or_else(|| DomainError::validation("user does not exist"))?;
        user.set_password_hash(password_hash.to_string());
        debug!(user_id = %id, "Password hash updated");
        Ok(())
    }
}
