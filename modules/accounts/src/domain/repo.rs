use crate::contract::model::{Item, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Storage-level failure taxonomy.
///
/// `Unavailable` covers connection-level failures and must never be collapsed
/// into a query error: callers surface it as a server-side outage, not as a
/// bad request or a credentials failure.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    #[error("query failed: {message}")]
    Query { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Fully-formed user row ready for insertion.
///
/// Service computes the hash and timestamps; the store assigns the id.
#[derive(Clone)]
pub struct NewUserRecord {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for NewUserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUserRecord")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Fully-formed item row ready for insertion.
#[derive(Debug, Clone)]
pub struct NewItemRecord {
    pub title: String,
    pub description: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Port for the domain layer: user persistence operations.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
    /// Credential lookup by email. Pure read, exact byte match.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Check uniqueness by username.
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;
    /// Check uniqueness by email.
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;
    /// Insert a new user; the store assigns the id.
    async fn insert(&self, record: NewUserRecord) -> Result<User, StoreError>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// Port for the domain layer: item persistence operations.
#[async_trait]
pub trait ItemsRepository: Send + Sync {
    /// Load an item by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Item>, StoreError>;
    /// Insert a new item; the store assigns the id.
    async fn insert(&self, record: NewItemRecord) -> Result<Item, StoreError>;
    /// All items owned by one user, the explicit reverse-relation query.
    async fn owned_by(&self, owner_id: i64) -> Result<Vec<Item>, StoreError>;
    /// Count of items owned by one user.
    async fn count_owned_by(&self, owner_id: i64) -> Result<u64, StoreError>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
