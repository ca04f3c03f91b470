use std::sync::Arc;

use crate::contract::model::{Credentials, Item, NewItem, NewUser, User};
use crate::domain::error::DomainError;
use crate::domain::password::PasswordHasher;
use crate::domain::repo::{
    ItemsRepository, NewItemRecord, NewUserRecord, StoreError, UsersRepository,
};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

/// Domain service with the business rules for accounts and items.
/// Depends only on the repository and hasher ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UsersRepository>,
    items: Arc<dyn ItemsRepository>,
    hasher: Arc<dyn PasswordHasher>,
    config: ServiceConfig,
}

/// Field bounds enforced before anything reaches the store.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_username_length: usize,
    pub max_email_length: usize,
    pub max_title_length: usize,
    pub max_description_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_username_length: 50,
            max_email_length: 255,
            max_title_length: 100,
            max_description_length: 500,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        users: Arc<dyn UsersRepository>,
        items: Arc<dyn ItemsRepository>,
        hasher: Arc<dyn PasswordHasher>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            users,
            items,
            hasher,
            config,
        }
    }

    /// Authenticate by email and password.
    ///
    /// A missing user and a failed verification collapse onto the same
    /// `InvalidCredentials` error; only store outages and primitive failures
    /// surface differently. Read-only and idempotent.
    #[instrument(
        name = "accounts.service.login",
        skip(self, credentials),
        fields(email = %credentials.email)
    )]
    pub async fn login(&self, credentials: Credentials) -> Result<User, DomainError> {
        debug!("Attempting login");

        let user = match self.users.find_by_email(&credentials.email).await? {
            Some(user) => user,
            None => {
                debug!("Login rejected");
                return Err(DomainError::invalid_credentials());
            }
        };

        let verified = self
            .hasher
            .verify(&credentials.password, &user.password_hash)
            .await?;

        if !verified {
            debug!("Login rejected");
            return Err(DomainError::invalid_credentials());
        }

        info!(user_id = user.id, "Login succeeded");
        Ok(user)
    }

    #[instrument(
        name = "accounts.service.register_user",
        skip(self, new_user),
        fields(username = %new_user.username, email = %new_user.email)
    )]
    pub async fn register_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Registering new user");

        self.validate_new_user(&new_user)?;

        // Pre-check uniqueness; the unique indexes stay the authoritative
        // backstop for raced inserts.
        if self.users.username_exists(&new_user.username).await? {
            return Err(DomainError::username_taken(new_user.username));
        }
        if self.users.email_exists(&new_user.email).await? {
            return Err(DomainError::email_taken(new_user.email));
        }

        let password_hash = self.hasher.hash(&new_user.password).await?;

        let now = Utc::now();
        let record = NewUserRecord {
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let user = match self.users.insert(record).await {
            Ok(user) => user,
            Err(StoreError::UniqueViolation) => {
                // Lost a race with a concurrent registration.
                warn!("Uniqueness violated on insert");
                return Err(if self.users.username_exists(&new_user.username).await? {
                    DomainError::username_taken(new_user.username)
                } else {
                    DomainError::email_taken(new_user.email)
                });
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = user.id, "Successfully registered user");
        Ok(user)
    }

    #[instrument(name = "accounts.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        debug!("Getting user by id");

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        Ok(user)
    }

    /// Delete a user. Refuses while the user still owns items; the foreign
    /// key's RESTRICT action enforces the same policy inside the store.
    #[instrument(name = "accounts.service.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting user");

        if self.items.count_owned_by(id).await? > 0 {
            return Err(DomainError::user_still_owns_items(id));
        }

        let deleted = match self.users.delete(id).await {
            Ok(deleted) => deleted,
            // An item was created for this user after the count.
            Err(StoreError::ForeignKeyViolation) => {
                return Err(DomainError::user_still_owns_items(id))
            }
            Err(e) => return Err(e.into()),
        };

        if !deleted {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    #[instrument(
        name = "accounts.service.create_item",
        skip(self, new_item),
        fields(owner_id = %new_item.owner_id)
    )]
    pub async fn create_item(&self, new_item: NewItem) -> Result<Item, DomainError> {
        info!("Creating new item");

        self.validate_new_item(&new_item)?;

        if self.users.find_by_id(new_item.owner_id).await?.is_none() {
            return Err(DomainError::owner_not_found(new_item.owner_id));
        }

        let record = NewItemRecord {
            title: new_item.title,
            description: new_item.description,
            owner_id: new_item.owner_id,
            created_at: Utc::now(),
        };

        let item = match self.items.insert(record).await {
            Ok(item) => item,
            // The owner was deleted between the existence check and the insert.
            Err(StoreError::ForeignKeyViolation) => {
                warn!("Owner vanished before insert");
                return Err(DomainError::owner_not_found(new_item.owner_id));
            }
            Err(e) => return Err(e.into()),
        };

        info!(item_id = item.id, "Successfully created item");
        Ok(item)
    }

    /// Explicit reverse-relation query: all items owned by one user.
    #[instrument(name = "accounts.service.items_owned_by", skip(self), fields(user_id = %user_id))]
    pub async fn items_owned_by(&self, user_id: i64) -> Result<Vec<Item>, DomainError> {
        debug!("Listing items for user");

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::user_not_found(user_id));
        }

        let items = self.items.owned_by(user_id).await?;
        debug!("Found {} items", items.len());
        Ok(items)
    }

    #[instrument(name = "accounts.service.delete_item", skip(self), fields(item_id = %id))]
    pub async fn delete_item(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting item");

        let deleted = self.items.delete(id).await?;
        if !deleted {
            return Err(DomainError::item_not_found(id));
        }

        info!("Successfully deleted item");
        Ok(())
    }

    // --- validation helpers ---

    fn validate_new_user(&self, new_user: &NewUser) -> Result<(), DomainError> {
        self.validate_username(&new_user.username)?;
        self.validate_email(&new_user.email)?;
        if new_user.password.is_empty() {
            return Err(DomainError::validation("password", "must not be empty"));
        }
        Ok(())
    }

    fn validate_username(&self, username: &str) -> Result<(), DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::validation("username", "must not be empty"));
        }
        if username.len() > self.config.max_username_length {
            return Err(DomainError::validation(
                "username",
                format!("must be at most {} bytes", self.config.max_username_length),
            ));
        }
        Ok(())
    }

    fn validate_email(&self, email: &str) -> Result<(), DomainError> {
        if email.is_empty() {
            return Err(DomainError::validation("email", "must not be empty"));
        }
        if email.len() > self.config.max_email_length {
            return Err(DomainError::validation(
                "email",
                format!("must be at most {} bytes", self.config.max_email_length),
            ));
        }
        Ok(())
    }

    fn validate_new_item(&self, new_item: &NewItem) -> Result<(), DomainError> {
        if new_item.title.trim().is_empty() {
            return Err(DomainError::validation("title", "must not be empty"));
        }
        if new_item.title.len() > self.config.max_title_length {
            return Err(DomainError::validation(
                "title",
                format!("must be at most {} bytes", self.config.max_title_length),
            ));
        }
        if new_item.description.len() > self.config.max_description_length {
            return Err(DomainError::validation(
                "description",
                format!(
                    "must be at most {} bytes",
                    self.config.max_description_length
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::password::PasswordHashError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory fakes so the login decision logic is testable without a
    /// database or a real hashing primitive.
    struct FakeUsers {
        rows: Mutex<Vec<User>>,
    }

    impl FakeUsers {
        fn with(users: Vec<User>) -> Arc<Self> {
            Arc::new(Self {
                rows: Mutex::new(users),
            })
        }
    }

    #[async_trait]
    impl UsersRepository for FakeUsers {
        async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
            Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .any(|u| u.username == username))
        }

        async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
            Ok(self.rows.lock().unwrap().iter().any(|u| u.email == email))
        }

        async fn insert(&self, record: NewUserRecord) -> Result<User, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            let user = User {
                id: rows.len() as i64 + 1,
                username: record.username,
                email: record.email,
                password_hash: record.password_hash,
                created_at: record.created_at,
                updated_at: record.updated_at,
            };
            rows.push(user.clone());
            Ok(user)
        }

        async fn delete(&self, id: i64) -> Result<bool, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|u| u.id != id);
            Ok(rows.len() < before)
        }
    }

    struct FakeItems;

    #[async_trait]
    impl ItemsRepository for FakeItems {
        async fn find_by_id(&self, _id: i64) -> Result<Option<Item>, StoreError> {
            Ok(None)
        }

        async fn insert(&self, record: NewItemRecord) -> Result<Item, StoreError> {
            Ok(Item {
                id: 1,
                title: record.title,
                description: record.description,
                owner_id: record.owner_id,
                created_at: record.created_at,
            })
        }

        async fn owned_by(&self, _owner_id: i64) -> Result<Vec<Item>, StoreError> {
            Ok(Vec::new())
        }

        async fn count_owned_by(&self, _owner_id: i64) -> Result<u64, StoreError> {
            Ok(0)
        }

        async fn delete(&self, _id: i64) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    /// Hash format transparent enough to assert against in tests.
    struct FakeHasher;

    #[async_trait]
    impl PasswordHasher for FakeHasher {
        async fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
            Ok(format!("hashed:{plaintext}"))
        }

        async fn verify(
            &self,
            candidate: &str,
            stored_hash: &str,
        ) -> Result<bool, PasswordHashError> {
            Ok(stored_hash == format!("hashed:{candidate}"))
        }
    }

    fn service_with(users: Arc<FakeUsers>) -> Service {
        Service::new(
            users,
            Arc::new(FakeItems),
            Arc::new(FakeHasher),
            ServiceConfig::default(),
        )
    }

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "hashed:Secret1!".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn login_succeeds_with_matching_password() {
        let svc = service_with(FakeUsers::with(vec![alice()]));

        let user = svc
            .login(Credentials {
                email: "a@x.com".to_string(),
                password: "Secret1!".to_string(),
            })
            .await
            .expect("login should succeed");

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let svc = service_with(FakeUsers::with(vec![alice()]));

        let wrong_password = svc
            .login(Credentials {
                email: "a@x.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .expect_err("wrong password must fail");

        let unknown_email = svc
            .login(Credentials {
                email: "nobody@x.com".to_string(),
                password: "anything".to_string(),
            })
            .await
            .expect_err("unknown email must fail");

        assert!(matches!(wrong_password, DomainError::InvalidCredentials));
        assert!(matches!(unknown_email, DomainError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username_and_email() {
        let svc = service_with(FakeUsers::with(vec![alice()]));

        let same_username = svc
            .register_user(NewUser {
                username: "alice".to_string(),
                email: "other@x.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .expect_err("duplicate username must fail");
        assert!(matches!(same_username, DomainError::UsernameTaken { .. }));

        let same_email = svc
            .register_user(NewUser {
                username: "bob".to_string(),
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .expect_err("duplicate email must fail");
        assert!(matches!(same_email, DomainError::EmailTaken { .. }));
    }

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let users = FakeUsers::with(Vec::new());
        let svc = service_with(users.clone());

        let user = svc
            .register_user(NewUser {
                username: "bob".to_string(),
                email: "b@x.com".to_string(),
                password: "Secret1!".to_string(),
            })
            .await
            .expect("registration should succeed");

        assert_ne!(user.password_hash, "Secret1!");
        assert!(!user.password_hash.is_empty());

        // And the stored credential round-trips through login.
        let logged_in = svc
            .login(Credentials {
                email: "b@x.com".to_string(),
                password: "Secret1!".to_string(),
            })
            .await
            .expect("login after registration should succeed");
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let svc = service_with(FakeUsers::with(vec![alice()]));

        let err = svc
            .login(Credentials {
                email: "A@X.COM".to_string(),
                password: "Secret1!".to_string(),
            })
            .await
            .expect_err("different casing is a different email");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn register_validates_fields() {
        let svc = service_with(FakeUsers::with(Vec::new()));

        let empty_email = svc
            .register_user(NewUser {
                username: "bob".to_string(),
                email: String::new(),
                password: "pw".to_string(),
            })
            .await
            .expect_err("empty email must fail");
        assert!(matches!(empty_email, DomainError::Validation { .. }));

        let empty_password = svc
            .register_user(NewUser {
                username: "bob".to_string(),
                email: "b@x.com".to_string(),
                password: String::new(),
            })
            .await
            .expect_err("empty password must fail");
        assert!(matches!(empty_password, DomainError::Validation { .. }));

        let long_username = svc
            .register_user(NewUser {
                username: "x".repeat(51),
                email: "b@x.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .expect_err("oversized username must fail");
        assert!(matches!(long_username, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn create_item_requires_existing_owner() {
        let svc = service_with(FakeUsers::with(Vec::new()));

        let err = svc
            .create_item(NewItem {
                title: "First".to_string(),
                description: "desc".to_string(),
                owner_id: 42,
            })
            .await
            .expect_err("missing owner must fail");
        assert!(matches!(err, DomainError::OwnerNotFound { owner_id: 42 }));
    }
}
