use auth::Role;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::map_user_error;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::PasswordPolicyError;

pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request_body(e.body_text()))?;

    let command = body.try_into_command()?;

    let user = state
        .user_service
        .create_user(command)
        .await
        .map_err(|e| map_user_error(e, "Failed to create user"))?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        "User created successfully",
        UserData::from(&user),
    ))
}

/// HTTP request body for the admin-side create endpoint (raw JSON)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    fullname: Option<String>,
    #[serde(default)]
    role: String,
    #[serde(default)]
    is_active: Option<bool>,
}

impl CreateUserRequest {
    /// Stricter than registration's 6-character minimum.
    const MIN_PASSWORD_LENGTH: usize = 8;

    fn try_into_command(self) -> Result<CreateUserCommand, ApiError> {
        let mut errors = Vec::new();

        let username = match Username::new(self.username) {
            Ok(username) => Some(username),
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        };

        let password_length = self.password.chars().count();
        if password_length < Self::MIN_PASSWORD_LENGTH {
            errors.push(
                PasswordPolicyError::TooShort {
                    min: Self::MIN_PASSWORD_LENGTH,
                    actual: password_length,
                }
                .to_string(),
            );
        }

        let role = match self.role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        };

        match (username, role) {
            (Some(username), Some(role)) if errors.is_empty() => Ok(CreateUserCommand {
                username,
                password: self.password,
                fullname: self.fullname.filter(|f| !f.is_empty()),
                role,
                is_active: self.is_active.unwrap_or(true),
            }),
            _ => Err(ApiError::validation(errors)),
        }
    }
}
