//! Persistence contract for user records.
//!
//! The store is an external collaborator: a document store offering
//! find/insert/update/delete by filter. Filters are a small closed set of
//! typed queries rather than free-form objects, which keeps the contract
//! explicit and rules out injection-style filter construction.
//!
//! Uniqueness of `username` and `email` is ultimately the store's concern:
//! an implementation that can enforce it (unique indexes, a single write
//! lock) reports violations as [`StoreError::DuplicateUsername`] /
//! [`StoreError::DuplicateEmail`], and the service's own pre-checks are an
//! optimization on top of that.

pub mod memory;
pub mod search;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{User, UserUpdate};
use search::SearchQuery;

/// Store backend failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a record with this username already exists")]
    DuplicateUsername,

    #[error("a record with this email already exists")]
    DuplicateEmail,

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Typed single-record query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserQuery {
    /// Exact match on the record identifier. Token subjects resolve through
    /// this variant as well.
    ById(Uuid),
    ByUsername(String),
    ByEmail(String),
}

impl UserQuery {
    pub fn by_id(id: Uuid) -> Self {
        UserQuery::ById(id)
    }

    pub fn by_username(username: impl Into<String>) -> Self {
        UserQuery::ByUsername(username.into())
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        UserQuery::ByEmail(email.into())
    }

    /// Whether `user` satisfies this query.
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserQuery::ById(id) => user.id == *id,
            UserQuery::ByUsername(username) => user.username == *username,
            UserQuery::ByEmail(email) => user.email == *email,
        }
    }
}

/// Typed multi-record filter.
#[derive(Debug, Clone)]
pub enum UserFilter {
    /// Every record. Deliberately unbounded; see the scaling note in the
    /// service documentation.
    All,
    /// Records where any requested attribute matches the search pattern.
    Matching(SearchQuery),
}

/// A single-record mutation.
///
/// Password changes are a distinct arm carrying an already-hashed value, so
/// a profile update can never touch the stored hash.
#[derive(Debug, Clone, Copy)]
pub enum UserPatch<'a> {
    Profile(&'a UserUpdate),
    Password(&'a str),
}

/// Persistence of user records.
///
/// All operations are single round-trips; the store provides atomicity per
/// call and nothing beyond that.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new record as given.
    ///
    /// # Errors
    ///
    /// Duplicate username/email where the backend enforces uniqueness, or a
    /// backend failure.
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    /// First record matching `query`, if any.
    async fn find_one(&self, query: &UserQuery) -> Result<Option<User>, StoreError>;

    /// All records matching `filter`.
    async fn find_many(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError>;

    /// Apply `patch` to the record with identifier `id` and return the
    /// updated record, or `None` when no such record exists.
    async fn update_one(&self, id: Uuid, patch: UserPatch<'_>) -> Result<Option<User>, StoreError>;

    /// Remove the first record matching `query` and return it, or `None`
    /// when nothing matched.
    async fn delete_one(&self, query: &UserQuery) -> Result<Option<User>, StoreError>;
}
