//! User management core for the accounts engine
//!
//! Business logic for registration, authentication, password reset via
//! security question, profile query/update, event-based role lookup and
//! uniqueness validation. Built on three leaf services:
//!
//! - a [`store::UserStore`] persisting user records,
//! - a [`account_crypto::PasswordHasher`] for one-way password hashing,
//! - a [`account_crypto::TokenSigner`] for bearer tokens.
//!
//! Every expected business failure is a distinct [`error::AccountError`]
//! variant; callers never have to match on strings or sentinel values.

pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use error::{AccountError, Result};
pub use models::{
    EventRole, NewUser, PublicUser, Role, SecurityQuestionInfo, User, UserUpdate,
};
pub use service::AccountService;
pub use store::search::{SearchAttribute, SearchPattern, SearchQuery};
pub use store::{memory::MemoryUserStore, StoreError, UserFilter, UserPatch, UserQuery, UserStore};
