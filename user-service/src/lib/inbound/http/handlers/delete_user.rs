use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::map_user_error;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let user_id =
        UserId::from_string(&id).map_err(|e| ApiError::validation(vec![e.to_string()]))?;

    state
        .user_service
        .delete_user(user_id)
        .await
        .map_err(|e| map_user_error(e, "Failed to delete user"))?;

    Ok(ApiSuccess::message_only(
        StatusCode::OK,
        "User deleted successfully",
    ))
}
