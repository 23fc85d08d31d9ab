//! Password hashing collaborator.
//!
//! The ledger never sees plaintext passwords beyond handing them to this
//! trait, and never recovers them: hashes are one-way and opaque.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use thiserror::Error;

/// Password hashing failure.
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing or hash parsing failed.
    #[error("password hashing error")]
    Hash,
}

/// One-way password hashing contract.
///
/// `hash` produces an opaque string; `verify` checks a raw password against
/// it. A mismatch is `Ok(false)`, not an error.
pub trait PasswordHasher: Send + Sync {
    /// Hash a raw password into an opaque, self-describing string.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] if hashing fails.
    fn hash(&self, raw: &str) -> Result<String, PasswordHashError>;

    /// Verify a raw password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] if the stored hash cannot be parsed.
    fn verify(&self, raw: &str, hash: &str) -> Result<bool, PasswordHashError>;
}

/// Default hasher using Argon2id with a random per-password salt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, raw: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| PasswordHashError::Hash)
    }

    fn verify(&self, raw: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordHashError::Hash)?;
        let argon2 = Argon2::default();

        match argon2.verify_password(raw.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(_) => Err(PasswordHashError::Hash),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("correct horse battery").unwrap();

        assert!(hasher.verify("correct horse battery", &hash).unwrap());
        assert!(!hasher.verify("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = Argon2Hasher;
        let a = hasher.hash("same input").unwrap();
        let b = hasher.hash("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        let hasher = Argon2Hasher;
        assert!(hasher.verify("anything", "not-a-phc-string").is_err());
    }
}
