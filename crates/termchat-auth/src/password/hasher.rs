//! SHA-256 secret hashing and verification.

use sha2::{Digest, Sha256};

/// Hashes login secrets into the hex digest kept in identity records.
///
/// Hashing is a pure function: the same secret always yields the same
/// digest, so verification is a digest comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a secret to a lowercase hex SHA-256 digest.
    pub fn hash_password(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Returns `true` if `password` hashes to `hash`.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        self.hash_password(password) == hash
    }
}
