//! In-memory user store for tests and Redis-free local runs.

use crate::error::AppError;
use crate::models::{unix_now, NewUser, StoredUser};
use crate::storage::UserStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// [`UserStore`] backed by a map keyed by email.
///
/// Uniqueness falls out of the map: the insert happens under the same lock
/// as the existence check, so a duplicate email can never slip in between.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, StoredUser>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users. Test hook.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Fetch a user by email without going through the trait. Test hook.
    pub fn get(&self, email: &str) -> Option<StoredUser> {
        self.lock().get(email).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredUser>> {
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, AppError> {
        Ok(self.lock().get(email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<StoredUser, AppError> {
        let user = StoredUser {
            id: nanoid::nanoid!(12),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: unix_now(),
        };

        let mut users = self.lock();
        if users.contains_key(&user.email) {
            return Err(AppError::DuplicateEmail);
        }
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }
}
