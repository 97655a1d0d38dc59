//! In-memory user store.
//!
//! Backs the test suites and serves as a development fallback when no
//! database is configured. Records live in insertion order behind a single
//! `RwLock`, so check-and-insert is atomic here and the uniqueness
//! invariant holds without a separate index.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, UserFilter, UserPatch, UserQuery, UserStore};
use crate::models::User;

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername);
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_one(&self, query: &UserQuery) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| query.matches(u)).cloned())
    }

    async fn find_many(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        match filter {
            UserFilter::All => Ok(users.clone()),
            UserFilter::Matching(search) => {
                let regex = search
                    .pattern
                    .compile()
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
                Ok(users
                    .iter()
                    .filter(|user| {
                        search
                            .attributes
                            .iter()
                            .flat_map(|attribute| attribute.values(user))
                            .any(|value| regex.is_match(value))
                    })
                    .cloned()
                    .collect())
            }
        }
    }

    async fn update_one(&self, id: Uuid, patch: UserPatch<'_>) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;

        // Uniqueness is re-checked under the same write lock that applies
        // the mutation, mirroring a unique-index violation in a database.
        if let UserPatch::Profile(update) = patch {
            if let Some(username) = &update.username {
                if users.iter().any(|u| u.id != id && u.username == *username) {
                    return Err(StoreError::DuplicateUsername);
                }
            }
            if let Some(email) = &update.email {
                if users.iter().any(|u| u.id != id && u.email == *email) {
                    return Err(StoreError::DuplicateEmail);
                }
            }
        }

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        match patch {
            UserPatch::Profile(update) => update.apply_to(user),
            UserPatch::Password(hash) => user.password = hash.to_owned(),
        }
        Ok(Some(user.clone()))
    }

    async fn delete_one(&self, query: &UserQuery) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        match users.iter().position(|u| query.matches(u)) {
            Some(index) => Ok(Some(users.remove(index))),
            None => Ok(None),
        }
    }
}
