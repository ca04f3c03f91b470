//! SeaORM-backed repository implementations for the domain ports.
//!
//! Both structs are generic over `C: ConnectionTrait`, so you can construct
//! them with a `DatabaseConnection` **or** a transactional connection.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};

use crate::contract::model::{Item, User};
use crate::domain::repo::{
    ItemsRepository, NewItemRecord, NewUserRecord, StoreError, UsersRepository,
};
use crate::infra::storage::mapper::{item_to_contract, user_to_contract};
use crate::infra::storage::{items, users};

/// Map a SeaORM error onto the store taxonomy. Connection-level failures
/// stay distinguishable from constraint violations and plain query errors.
fn classify(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::UniqueViolation,
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => StoreError::ForeignKeyViolation,
        _ => match err {
            DbErr::Conn(e) => StoreError::unavailable(e.to_string()),
            DbErr::ConnectionAcquire(e) => StoreError::unavailable(e.to_string()),
            other => StoreError::query(other.to_string()),
        },
    }
}

/// SeaORM users repository.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let found = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(classify)?;
        Ok(found.map(user_to_contract))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let found = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .map_err(classify)?;
        Ok(found.map(user_to_contract))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.conn)
            .await
            .map_err(classify)?;
        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .map_err(classify)?;
        Ok(count > 0)
    }

    async fn insert(&self, record: NewUserRecord) -> Result<User, StoreError> {
        let m = users::ActiveModel {
            username: Set(record.username),
            email: Set(record.email),
            password_hash: Set(record.password_hash),
            created_at: Set(record.created_at),
            updated_at: Set(record.updated_at),
            ..Default::default()
        };
        let inserted = m.insert(&self.conn).await.map_err(classify)?;
        Ok(user_to_contract(inserted))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let res = users::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .map_err(classify)?;
        Ok(res.rows_affected > 0)
    }
}

/// SeaORM items repository.
pub struct SeaOrmItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> ItemsRepository for SeaOrmItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> Result<Option<Item>, StoreError> {
        let found = items::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(classify)?;
        Ok(found.map(item_to_contract))
    }

    async fn insert(&self, record: NewItemRecord) -> Result<Item, StoreError> {
        let m = items::ActiveModel {
            title: Set(record.title),
            description: Set(record.description),
            owner_id: Set(record.owner_id),
            created_at: Set(record.created_at),
            ..Default::default()
        };
        let inserted = m.insert(&self.conn).await.map_err(classify)?;
        Ok(item_to_contract(inserted))
    }

    async fn owned_by(&self, owner_id: i64) -> Result<Vec<Item>, StoreError> {
        let rows = items::Entity::find()
            .filter(items::Column::OwnerId.eq(owner_id))
            .order_by_asc(items::Column::Id)
            .all(&self.conn)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(item_to_contract).collect())
    }

    async fn count_owned_by(&self, owner_id: i64) -> Result<u64, StoreError> {
        items::Entity::find()
            .filter(items::Column::OwnerId.eq(owner_id))
            .count(&self.conn)
            .await
            .map_err(classify)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let res = items::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .map_err(classify)?;
        Ok(res.rows_affected > 0)
    }
}
