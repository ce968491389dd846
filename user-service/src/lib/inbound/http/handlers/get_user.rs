use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::map_user_error;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id =
        UserId::from_string(&id).map_err(|e| ApiError::validation(vec![e.to_string()]))?;

    let user = state
        .user_service
        .get_user(user_id)
        .await
        .map_err(|e| map_user_error(e, "Failed to retrieve user"))?;

    Ok(ApiSuccess::new(StatusCode::OK, "OK", UserData::from(&user)))
}
