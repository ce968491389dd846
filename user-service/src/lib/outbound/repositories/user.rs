use std::str::FromStr;

use async_trait::async_trait;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;

use crate::domain::user::models::ListQuery;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str =
    "id, username, password_hash, fullname, role, is_active, created_at, updated_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: Option<String>,
    fullname: Option<String>,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
            fullname: row.fullname,
            role: Role::from_str(&row.role)?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_unique_violation(e: sqlx::Error, username: &Username) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_username_key") {
            return UserError::UsernameAlreadyExists(username.as_str().to_string());
        }
    }
    UserError::DatabaseError(e.to_string())
}

/// Append the WHERE clause for keyword search and equality filters.
///
/// Column names come from the typed whitelist, never from the query string.
fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, query: &ListQuery) {
    let mut prefix = " WHERE ";

    if let Some(keyword) = &query.keyword {
        let pattern = format!("%{}%", keyword);
        builder.push(prefix);
        builder.push("(username ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR fullname ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR role ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
        prefix = " AND ";
    }

    for filter in &query.filters {
        builder.push(prefix);
        match filter {
            UserFilter::Username(value) => {
                builder.push("username = ");
                builder.push_bind(value.clone());
            }
            UserFilter::Fullname(value) => {
                builder.push("fullname = ");
                builder.push_bind(value.clone());
            }
            UserFilter::Role(value) => {
                builder.push("role = ");
                builder.push_bind(value.clone());
            }
            UserFilter::IsActive(value) => {
                builder.push("is_active = ");
                builder.push_bind(*value);
            }
        }
        prefix = " AND ";
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (username, password_hash, fullname, role, is_active) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(&user.fullname)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &user.username))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self, query: &ListQuery) -> Result<UserPage, UserError> {
        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_conditions(&mut count_builder, query);

        let total_count: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_conditions(&mut builder, query);
        builder.push(" ORDER BY ");
        builder.push(query.sort_by.as_column());
        builder.push(" ");
        builder.push(query.order.as_sql());
        builder.push(" LIMIT ");
        builder.push_bind(query.per_page);
        builder.push(" OFFSET ");
        builder.push_bind(query.offset());

        let rows: Vec<UserRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let records = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UserPage {
            records,
            total_count,
            page_count: UserPage::page_count_for(total_count, query.per_page),
        })
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users \
             SET username = $2, fullname = $3, role = $4, is_active = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(&user.fullname)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &user.username))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), UserError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.0)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
