use async_trait::async_trait;
use thiserror::Error;

/// Failure of the hashing primitive itself.
///
/// Distinct from an `Ok(false)` mismatch: a primitive failure is an internal
/// error, never a login decision.
#[derive(Error, Debug)]
pub enum PasswordHashError {
    #[error("hashing failed: {message}")]
    Hash { message: String },

    #[error("stored hash is malformed")]
    MalformedHash,
}

impl PasswordHashError {
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

/// Port for one-way password hashing and verification.
///
/// The stored hash carries its own salt and cost factor; `verify` must
/// delegate equality to the primitive's own routine, never compare strings.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash of the plaintext, safe to store.
    async fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;
    /// Check a candidate plaintext against a stored hash.
    async fn verify(&self, candidate: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}
