use std::fmt;

use auth::Role;
use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// `password_hash` is nullable in storage (externally provisioned accounts
/// have none) and is never serialized into responses.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub password_hash: Option<String>,
    pub fullname: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from a path parameter.
    ///
    /// # Errors
    /// * `InvalidFormat` - string is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        s.parse::<i64>()
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username length stays within the 3-100 character bounds the
/// storage schema allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 100;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - shorter than 3 characters
    /// * `TooLong` - longer than 100 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new user with domain types.
///
/// The password is plaintext here; the service hashes it before anything is
/// persisted.
#[derive(Debug)]
pub struct CreateUserCommand {
    pub username: Username,
    pub password: String,
    pub fullname: Option<String>,
    pub role: Role,
    pub is_active: bool,
}

/// Command to update an existing user with optional validated fields.
///
/// Only provided fields are updated. The password is deliberately absent;
/// it changes only through the dedicated reset operation.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub username: Option<Username>,
    pub fullname: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// Row to insert; the store assigns id and timestamps.
#[derive(Debug)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
    pub fullname: Option<String>,
    pub role: Role,
    pub is_active: bool,
}

/// Column a listing may sort by. Unknown names from the query string fall
/// back to `Id` instead of reaching the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Username,
    Fullname,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn as_column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Username => "username",
            SortField::Fullname => "fullname",
            SortField::Role => "role",
            SortField::IsActive => "is_active",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    pub fn parse_or_default(name: &str) -> Self {
        match name {
            "id" => SortField::Id,
            "username" => SortField::Username,
            "fullname" => SortField::Fullname,
            "role" => SortField::Role,
            "is_active" => SortField::IsActive,
            "created_at" => SortField::CreatedAt,
            "updated_at" => SortField::UpdatedAt,
            _ => SortField::Id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Whitelisted equality filter for the listing endpoint.
///
/// `Role` keeps its raw value so an unknown role filters to zero rows
/// rather than erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Username(String),
    Fullname(String),
    Role(String),
    IsActive(bool),
}

/// Pagination, sorting, search, and filtering for the listing endpoint.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// 1-based page number
    pub page: i64,
    pub per_page: i64,
    pub sort_by: SortField,
    pub order: SortOrder,
    /// Case-insensitive LIKE search over username, fullname, and role
    pub keyword: Option<String>,
    pub filters: Vec<UserFilter>,
}

impl ListQuery {
    pub const DEFAULT_PER_PAGE: i64 = 10;

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: Self::DEFAULT_PER_PAGE,
            sort_by: SortField::Id,
            order: SortOrder::Asc,
            keyword: None,
            filters: Vec::new(),
        }
    }
}

/// One page of users plus the counts the response metadata needs.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub records: Vec<User>,
    pub total_count: i64,
    pub page_count: i64,
}

impl UserPage {
    pub fn page_count_for(total_count: i64, per_page: i64) -> i64 {
        if per_page <= 0 {
            return 0;
        }
        (total_count + per_page - 1) / per_page
    }
}
