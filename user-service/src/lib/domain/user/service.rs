use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::ListQuery;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
/// Password hashing happens here so no plaintext ever reaches a repository.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = NewUser {
            username: command.username,
            password_hash,
            fullname: command.fullname,
            role: command.role,
            is_active: command.is_active,
        };

        self.repository.create(user).await
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFound(username.to_string()))
    }

    async fn list_users(&self, query: ListQuery) -> Result<UserPage, UserError> {
        self.repository.list(&query).await
    }

    async fn update_user(
        &self,
        id: UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_username) = command.username {
            user.username = new_username;
        }

        if let Some(new_fullname) = command.fullname {
            user.fullname = Some(new_fullname);
        }

        if let Some(new_role) = command.role {
            user.role = new_role;
        }

        if let Some(new_is_active) = command.is_active {
            user.is_active = new_is_active;
        }

        self.repository.update(user).await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UserError> {
        self.repository.delete(id).await
    }

    async fn reset_password(&self, id: UserId, new_password: &str) -> Result<(), UserError> {
        let password_hash = self.password_hasher.hash(new_password)?;

        self.repository.update_password(id, &password_hash).await
    }
}

#[cfg(test)]
mod tests {
    use auth::Role;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn list(&self, query: &ListQuery) -> Result<UserPage, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), UserError>;
            async fn delete(&self, id: UserId) -> Result<(), UserError>;
        }
    }

    fn stored_user(id: i64, username: &str) -> User {
        User {
            id: UserId(id),
            username: Username::new(username.to_string()).unwrap(),
            password_hash: Some("$argon2id$test_hash".to_string()),
            fullname: Some("Test User".to_string()),
            role: Role::User,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn created_from(new_user: NewUser) -> User {
        User {
            id: UserId(1),
            username: new_user.username,
            password_hash: Some(new_user.password_hash),
            fullname: new_user.fullname,
            role: new_user.role,
            is_active: new_user.is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "testuser"
                    && user.password_hash.starts_with("$argon2")
                    && user.password_hash != "password123"
            })
            .times(1)
            .returning(|user| Ok(created_from(user)));

        let service = UserService::new(Arc::new(repository));

        let command = CreateUserCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            password: "password123".to_string(),
            fullname: Some("Test User".to_string()),
            role: Role::User,
            is_active: true,
        };

        let user = service.create_user(command).await.unwrap();
        assert_eq!(user.username.as_str(), "testuser");
        assert!(user.password_hash.unwrap().starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_create().times(1).returning(|user| {
            Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(repository));

        let command = CreateUserCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            password: "password456".to_string(),
            fullname: None,
            role: Role::Admin,
            is_active: true,
        };

        let result = service.create_user(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repository = MockTestUserRepository::new();

        let expected = stored_user(7, "testuser");
        let returned = expected.clone();
        repository
            .expect_find_by_id()
            .with(eq(UserId(7)))
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = UserService::new(Arc::new(repository));

        let user = service.get_user(UserId(7)).await.unwrap();
        assert_eq!(user.id, UserId(7));
        assert_eq!(user.username.as_str(), "testuser");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let result = service.get_user(UserId(404)).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_user_by_username_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let username = Username::new("nonexistent".to_string()).unwrap();
        let result = service.get_user_by_username(&username).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_user_overlays_provided_fields() {
        let mut repository = MockTestUserRepository::new();

        let existing = stored_user(3, "olduser");
        let returned = existing.clone();
        repository
            .expect_find_by_id()
            .with(eq(UserId(3)))
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        repository
            .expect_update()
            .withf(|user| {
                user.username.as_str() == "newuser"
                    && user.fullname.as_deref() == Some("Test User")
                    && user.role == Role::Admin
                    && !user.is_active
            })
            .times(1)
            .returning(Ok);

        let service = UserService::new(Arc::new(repository));

        let command = UpdateUserCommand {
            username: Some(Username::new("newuser".to_string()).unwrap()),
            fullname: None,
            role: Some(Role::Admin),
            is_active: Some(false),
        };

        let updated = service.update_user(UserId(3), command).await.unwrap();
        assert_eq!(updated.username.as_str(), "newuser");
        // Absent fields keep their stored values
        assert_eq!(updated.fullname.as_deref(), Some("Test User"));
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let command = UpdateUserCommand {
            username: None,
            fullname: None,
            role: None,
            is_active: None,
        };

        let result = service.update_user(UserId(404), command).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_delete()
            .with(eq(UserId(9)))
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(Arc::new(repository));

        assert!(service.delete_user(UserId(9)).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_stores_new_hash() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_update_password()
            .withf(|id, hash| *id == UserId(5) && hash.starts_with("$argon2"))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = UserService::new(Arc::new(repository));

        assert!(service.reset_password(UserId(5), "new_password").await.is_ok());
    }
}
