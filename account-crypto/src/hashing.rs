//! One-way password hashing built on bcrypt.
//!
//! The salt is generated per hash by bcrypt itself and embedded in the
//! output string, so verification only needs the stored value.

use thiserror::Error;

/// Work factor used for salt generation. Controls brute-force resistance;
/// raising it doubles the hashing cost per increment.
pub const SALT_WORK_FACTOR: u32 = 10;

/// Failure of the underlying hashing primitive.
///
/// A password mismatch is not an error; it is reported as `Ok(false)`
/// by [`PasswordHasher::verify`].
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(#[from] bcrypt::BcryptError);

/// Hashes and verifies passwords with a fixed work factor.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt work factor.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password with a freshly generated salt.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the bcrypt primitive fails.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Recompute the hash for `plaintext` using the salt embedded in
    /// `hashed` and compare the two.
    ///
    /// Returns `Ok(false)` on a mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if `hashed` is not a valid bcrypt string or
    /// the primitive fails.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, HashError> {
        Ok(bcrypt::verify(plaintext, hashed)?)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(SALT_WORK_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the test suite fast; the work factor does not change
    // the hash/verify contract.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_verify_roundtrip() {
        let hasher = PasswordHasher::new(TEST_COST);
        let hashed = hasher.hash("pw1").unwrap();

        assert_ne!(hashed, "pw1");
        assert!(hasher.verify("pw1", &hashed).unwrap());
    }

    #[test]
    fn mismatch_is_false_not_error() {
        let hasher = PasswordHasher::new(TEST_COST);
        let hashed = hasher.hash("pw1").unwrap();

        assert!(!hasher.verify("wrongpw", &hashed).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = PasswordHasher::new(TEST_COST);
        let first = hasher.hash("pw1").unwrap();
        let second = hasher.hash("pw1").unwrap();

        // Fresh salt per hash.
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_hash_is_an_error() {
        let hasher = PasswordHasher::new(TEST_COST);
        assert!(hasher.verify("pw1", "not-a-bcrypt-string").is_err());
    }
}
