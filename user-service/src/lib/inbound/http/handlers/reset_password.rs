use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::map_user_error;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::errors::PasswordPolicyError;

pub async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<ApiSuccess<()>, ApiError> {
    let user_id =
        UserId::from_string(&id).map_err(|e| ApiError::validation(vec![e.to_string()]))?;

    let Json(body) = body.map_err(|e| ApiError::bad_request_body(e.body_text()))?;
    body.validate()?;

    state
        .user_service
        .reset_password(user_id, &body.new_password)
        .await
        .map_err(|e| map_user_error(e, "Failed to reset password"))?;

    Ok(ApiSuccess::message_only(
        StatusCode::OK,
        "Password reset successfully",
    ))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    new_password: String,
}

impl ResetPasswordRequest {
    const MIN_PASSWORD_LENGTH: usize = 8;

    fn validate(&self) -> Result<(), ApiError> {
        let length = self.new_password.chars().count();
        if length < Self::MIN_PASSWORD_LENGTH {
            return Err(ApiError::validation(vec![PasswordPolicyError::TooShort {
                min: Self::MIN_PASSWORD_LENGTH,
                actual: length,
            }
            .to_string()]));
        }
        Ok(())
    }
}
