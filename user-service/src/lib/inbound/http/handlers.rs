use auth::Role;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod list_users;
pub mod login;
pub mod refresh_token;
pub mod register;
pub mod reset_password;
pub mod update_user;

/// Uniform response envelope, success and error alike.
///
/// `data` and `errors` are omitted from the JSON when absent.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponseBody<T: Serialize> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponseBody<T> {
    fn new(
        status: StatusCode,
        message: impl Into<String>,
        data: Option<T>,
        errors: Option<Vec<String>>,
    ) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data,
            errors,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<ApiResponseBody<T>>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: &str, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody::new(status, message, Some(data), None)),
        )
    }
}

impl ApiSuccess<()> {
    /// Envelope without a `data` field, for operations that return nothing.
    pub fn message_only(status: StatusCode, message: &str) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, message, None, None)))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest { message: String, errors: Vec<String> },
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    InternalServerError { message: String, errors: Vec<String> },
}

impl ApiError {
    /// 400 with field-level messages in `errors`.
    pub fn validation(errors: Vec<String>) -> Self {
        ApiError::BadRequest {
            message: "Validation error".to_string(),
            errors,
        }
    }

    /// 400 for a body that could not be deserialized at all.
    pub fn bad_request_body(detail: String) -> Self {
        ApiError::BadRequest {
            message: "Invalid request body".to_string(),
            errors: vec![detail],
        }
    }

    pub fn internal(message: &str, errors: Vec<String>) -> Self {
        ApiError::InternalServerError {
            message: message.to_string(),
            errors,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::BadRequest { message, errors } => (StatusCode::BAD_REQUEST, message, errors),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, Vec::new()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message, Vec::new()),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message, Vec::new()),
            ApiError::InternalServerError { message, errors } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, errors)
            }
        };

        let errors = if errors.is_empty() { None } else { Some(errors) };
        let body: ApiResponseBody<()> = ApiResponseBody::new(status, message, None, errors);

        (status, Json(body)).into_response()
    }
}

/// Map a domain error into the envelope, with the call site's wording for
/// infrastructure failures ("Failed to create user", ...).
pub fn map_user_error(err: UserError, internal_message: &str) -> ApiError {
    match err {
        UserError::InvalidUserId(_)
        | UserError::InvalidUsername(_)
        | UserError::InvalidPassword(_)
        | UserError::InvalidRole(_) => ApiError::validation(vec![err.to_string()]),
        UserError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
        UserError::UsernameAlreadyExists(_) => ApiError::Conflict(err.to_string()),
        UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
        UserError::PasswordHash(detail) | UserError::DatabaseError(detail) => {
            ApiError::internal(internal_message, vec![detail])
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        map_user_error(err, "Internal server error")
    }
}

/// User representation returned by every endpoint; the password hash never
/// leaves the service.
#[derive(Debug, Clone, Serialize)]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub fullname: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
            fullname: user.fullname.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
