//! Password hashing and token signing for the accounts engine
//!
//! Two small, opaque services the user-management core is built on:
//!
//! - [`PasswordHasher`]: one-way bcrypt hashing and verification
//! - [`TokenSigner`]: signing a user identifier into a bearer token and
//!   verifying/decoding it again
//!
//! Both are plain values that are constructed once at startup from
//! configuration and injected wherever they are needed.

pub mod hashing;
pub mod tokens;

pub use hashing::{HashError, PasswordHasher, SALT_WORK_FACTOR};
pub use tokens::{TokenConfig, TokenError, TokenSigner};
