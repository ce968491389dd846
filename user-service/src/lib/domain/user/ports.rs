use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::ListQuery;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create a new user, hashing the command's plaintext password.
    ///
    /// # Errors
    /// * `PasswordHash` - hashing failed; nothing is stored
    /// * `UsernameAlreadyExists` - username is already taken
    /// * `DatabaseError` - storage operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    /// * `DatabaseError` - storage operation failed
    async fn get_user(&self, id: UserId) -> Result<User, UserError>;

    /// Retrieve user by unique username.
    ///
    /// # Errors
    /// * `NotFound` - no user with this username
    /// * `DatabaseError` - storage operation failed
    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError>;

    /// Retrieve one page of users matching the query.
    ///
    /// # Errors
    /// * `DatabaseError` - storage operation failed
    async fn list_users(&self, query: ListQuery) -> Result<UserPage, UserError>;

    /// Update existing user with optional fields.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    /// * `UsernameAlreadyExists` - new username is already taken
    /// * `DatabaseError` - storage operation failed
    async fn update_user(&self, id: UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Delete existing user.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    /// * `DatabaseError` - storage operation failed
    async fn delete_user(&self, id: UserId) -> Result<(), UserError>;

    /// Replace a user's password hash with the hash of `new_password`.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    /// * `PasswordHash` - hashing failed; nothing is stored
    /// * `DatabaseError` - storage operation failed
    async fn reset_password(&self, id: UserId, new_password: &str) -> Result<(), UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user; the store assigns id and timestamps.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - unique constraint violation
    /// * `DatabaseError` - storage operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier; `None` when absent.
    ///
    /// # Errors
    /// * `DatabaseError` - storage operation failed
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username; `None` when absent.
    ///
    /// # Errors
    /// * `DatabaseError` - storage operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve one page of users plus counts for the query.
    ///
    /// # Errors
    /// * `DatabaseError` - storage operation failed
    async fn list(&self, query: &ListQuery) -> Result<UserPage, UserError>;

    /// Update existing user in storage; refreshes `updated_at`.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    /// * `UsernameAlreadyExists` - new username is already taken
    /// * `DatabaseError` - storage operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Replace only the stored password hash; refreshes `updated_at`.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    /// * `DatabaseError` - storage operation failed
    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    /// * `DatabaseError` - storage operation failed
    async fn delete(&self, id: UserId) -> Result<(), UserError>;
}
