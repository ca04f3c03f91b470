use crate::contract::model::{Item, User};
use crate::infra::storage::{items, users};

/// Convert a database entity to a contract model
pub fn user_to_contract(entity: users::Model) -> User {
    User {
        id: entity.id,
        username: entity.username,
        email: entity.email,
        password_hash: entity.password_hash,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

pub fn item_to_contract(entity: items::Model) -> Item {
    Item {
        id: entity.id,
        title: entity.title,
        description: entity.description,
        owner_id: entity.owner_id,
        created_at: entity.created_at,
    }
}
