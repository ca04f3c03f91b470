use crate::domain::password::PasswordHashError;
use crate::domain::repo::StoreError;
use thiserror::Error;

/// Domain-specific errors using thiserror.
///
/// `InvalidCredentials` deliberately carries no cause: a missing user and a
/// wrong password must stay indistinguishable all the way to the caller.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found: {id}")]
    UserNotFound { id: i64 },

    #[error("Item not found: {id}")]
    ItemNotFound { id: i64 },

    #[error("Username '{username}' is already taken")]
    UsernameTaken { username: String },

    #[error("User with email '{email}' already exists")]
    EmailTaken { email: String },

    #[error("Item owner {owner_id} does not exist")]
    OwnerNotFound { owner_id: i64 },

    #[error("User {id} still owns items")]
    UserStillOwnsItems { id: i64 },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Password hashing error: {message}")]
    Hashing { message: String },
}

impl DomainError {
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn user_not_found(id: i64) -> Self {
        Self::UserNotFound { id }
    }

    pub fn item_not_found(id: i64) -> Self {
        Self::ItemNotFound { id }
    }

    pub fn username_taken(username: impl Into<String>) -> Self {
        Self::UsernameTaken {
            username: username.into(),
        }
    }

    pub fn email_taken(email: impl Into<String>) -> Self {
        Self::EmailTaken {
            email: email.into(),
        }
    }

    pub fn owner_not_found(owner_id: i64) -> Self {
        Self::OwnerNotFound { owner_id }
    }

    pub fn user_still_owns_items(id: i64) -> Self {
        Self::UserStillOwnsItems { id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable { message } => Self::Unavailable { message },
            other => Self::Database {
                message: other.to_string(),
            },
        }
    }
}

impl From<PasswordHashError> for DomainError {
    fn from(e: PasswordHashError) -> Self {
        Self::Hashing {
            message: e.to_string(),
        }
    }
}
