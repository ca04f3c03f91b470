use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contract::model::{Credentials, Item, NewItem, NewUser, User};

/// REST representation of a user. Deliberately has no `password_hash` field,
/// so the hash cannot be serialized out by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for the login request. Carries a plaintext password, so `Debug`
/// redacts it; handlers may log the request body safely.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginReq")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// REST DTO for registering a new user.
#[derive(Clone, Serialize, Deserialize)]
pub struct CreateUserReq {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for CreateUserReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserReq")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// REST representation of an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// REST DTO for creating a new item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemReq {
    pub title: String,
    pub description: String,
    pub owner_id: i64,
}

/// REST DTO for an item list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemListDto {
    pub items: Vec<ItemDto>,
    pub total: usize,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<LoginReq> for Credentials {
    fn from(req: LoginReq) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            owner_id: item.owner_id,
            created_at: item.created_at,
        }
    }
}

impl From<CreateItemReq> for NewItem {
    fn from(req: CreateItemReq) -> Self {
        Self {
            title: req.title,
            description: req.description,
            owner_id: req.owner_id,
        }
    }
}
