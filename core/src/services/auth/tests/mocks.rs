//! Mock implementations for testing the session service

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{CacheError, DomainError};
use crate::repositories::UserRepository;
use crate::services::auth::PasswordResetNotifier;
use crate::services::cache::{CacheService, MemoryCache};

pub struct MockUserRepository {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_existing_user(user: User) -> Self {
        let repo = Self::new();
        repo.users.lock().unwrap().push(user);
        repo
    }

    pub fn remove(&self, id: Uuid) {
        self.users.lock().unwrap().retain(|u| u.id != id);
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict {
                message: "email already registered".to_string(),
            });
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.set_password_hash(password_hash.to_string());
                Ok(())
            }
            None => Err(DomainError::validation("user not found")),
        }
    }
}

/// Records every reset token it is asked to deliver
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn last_token(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, token)| token.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl PasswordResetNotifier for RecordingNotifier {
    async fn send_reset_token(&self, email: &str, token: &str) -> Result<(), DomainError> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

/// Memory cache that can be switched into a full outage
#[derive(Default)]
pub struct OutageCache {
    pub inner: MemoryCache,
    pub down: AtomicBool,
}

impl OutageCache {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(CacheError::unavailable("timed out after 3s"));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheService for OutageCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.check()?;
        self.inner.set(key, value, ttl).await
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.check()?;
        self.inner.exists(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn clear_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        self.check()?;
        self.inner.clear_pattern(pattern).await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &[u8],
        new: &[u8],
        ttl: Duration,
    ) -> Result<bool, CacheError> {
        self.check()?;
        self.inner.compare_and_swap(key, expected, new, ttl).await
    }
}
