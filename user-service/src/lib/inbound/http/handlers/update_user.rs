use auth::Role;
use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::map_user_error;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id =
        UserId::from_string(&id).map_err(|e| ApiError::validation(vec![e.to_string()]))?;

    let Json(body) = body.map_err(|e| ApiError::bad_request_body(e.body_text()))?;
    let command = body.try_into_command()?;

    let user = state
        .user_service
        .update_user(user_id, command)
        .await
        .map_err(|e| map_user_error(e, "Failed to update user"))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "User updated successfully",
        UserData::from(&user),
    ))
}

/// HTTP request body for partial updates (raw JSON).
///
/// The password cannot be changed here; that goes through the dedicated
/// reset endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub fullname: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ApiError> {
        let mut errors = Vec::new();

        let username = match self.username.map(Username::new).transpose() {
            Ok(username) => username,
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        };

        let role = match self.role.as_deref().map(str::parse::<Role>).transpose() {
            Ok(role) => role,
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        };

        if !errors.is_empty() {
            return Err(ApiError::validation(errors));
        }

        Ok(UpdateUserCommand {
            username,
            fullname: self.fullname,
            role,
            is_active: self.is_active,
        })
    }
}
