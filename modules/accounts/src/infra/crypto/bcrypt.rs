//! Bcrypt adapter for the `PasswordHasher` port.
//!
//! Stored hashes embed the cost factor and a per-hash random salt, so
//! verification never needs configuration beyond the hash itself.
//! Bcrypt is CPU-bound; both operations run on the blocking pool.

use async_trait::async_trait;

use crate::domain::password::{PasswordHashError, PasswordHasher};

/// Hasher backed by the `bcrypt` crate.
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with an explicit cost factor. Tests use
    /// `bcrypt::MIN_COST` to stay fast.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let cost = self.cost;
        let plaintext = plaintext.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| PasswordHashError::hash(e.to_string()))?
            .map_err(|e| PasswordHashError::hash(e.to_string()))
    }

    async fn verify(&self, candidate: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        let candidate = candidate.to_owned();
        let stored_hash = stored_hash.to_owned();

        // bcrypt::verify performs the primitive's own constant-time
        // comparison; a hash it cannot parse is an error, not a mismatch.
        tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &stored_hash))
            .await
            .map_err(|e| PasswordHashError::hash(e.to_string()))?
            .map_err(|_| PasswordHashError::MalformedHash)
    }
}
