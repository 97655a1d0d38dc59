//! Error taxonomy surfaced by the user-management core.
//!
//! Every expected business failure is a distinct variant the boundary can
//! match on without string comparison. Infrastructure failures (store
//! backend, hashing primitive) are separate variants the boundary treats as
//! internal errors.

use thiserror::Error;

use crate::store::StoreError;
use account_crypto::{HashError, TokenError};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("username already exists")]
    UsernameTaken,

    #[error("this email is already used")]
    EmailTaken,

    #[error("no user found")]
    UserNotFound,

    #[error("no event found")]
    EventNotFound,

    /// Username exists but the password did not match, or a security answer
    /// comparison failed.
    #[error("wrong credentials")]
    BadCredentials,

    #[error("no password entered")]
    EmptyPassword,

    /// A required field is missing or blank.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Hashing(#[from] HashError),

    #[error(transparent)]
    TokenVerification(#[from] TokenError),

    /// Store backend failure (connection, query, serialization).
    #[error("store error: {0}")]
    Store(String),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            // Unique-index violations reported by the store are the
            // authoritative uniqueness signal; the pre-checks in the service
            // are an optimization only.
            StoreError::DuplicateUsername => AccountError::UsernameTaken,
            StoreError::DuplicateEmail => AccountError::EmailTaken,
            StoreError::Backend(message) => AccountError::Store(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, AccountError>;
