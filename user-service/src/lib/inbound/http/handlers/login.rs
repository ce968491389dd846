use auth::AccessClaims;
use auth::AuthenticationError;
use auth::BasicCredentials;
use auth::Role;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::map_user_error;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Unknown username and wrong password share this exact response so the
/// endpoint cannot be used to enumerate accounts.
const GENERIC_LOGIN_FAILURE: &str = "username or password wrong";

pub async fn login(
    State(state): State<AppState>,
    Extension(credentials): Extension<BasicCredentials>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request_body(e.body_text()))?;

    let mut errors = Vec::new();
    if body.username.is_empty() {
        errors.push("username is required".to_string());
    }
    if body.password.is_empty() {
        errors.push("password is required".to_string());
    }
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    // Double-entry check: the JSON body must repeat the Basic Auth pair
    if body.username != credentials.username || body.password != credentials.password {
        return Err(ApiError::Unauthorized(
            "Request body does not match Basic Auth credentials".to_string(),
        ));
    }

    // A username the value type rejects cannot exist, so it fails the same
    // way as an unknown one
    let username = Username::new(body.username)
        .map_err(|_| ApiError::Unauthorized(GENERIC_LOGIN_FAILURE.to_string()))?;

    let user = state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => ApiError::Unauthorized(GENERIC_LOGIN_FAILURE.to_string()),
            other => map_user_error(other, "Failed to retrieve user"),
        })?;

    // TODO: put the stored fullname into the fullname claim once API
    // consumers confirm nothing keys on the current username value
    let claims = AccessClaims::new(
        user.id.0,
        user.username.as_str(),
        user.username.as_str(),
        user.role,
        state.authenticator.ttl_hours(),
    );

    let stored_hash = user.password_hash.as_deref().unwrap_or_default();
    let result = state
        .authenticator
        .authenticate(&body.password, stored_hash, &claims)
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                ApiError::Unauthorized(GENERIC_LOGIN_FAILURE.to_string())
            }
            AuthenticationError::Password(err) => {
                ApiError::internal("Failed to verify password", vec![err.to_string()])
            }
            AuthenticationError::Token(err) => {
                ApiError::internal("Failed to issue token", vec![err.to_string()])
            }
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Login success",
        LoginResponseData {
            user_id: user.id.0,
            username: user.username.as_str().to_string(),
            fullname: user.fullname.clone(),
            role: user.role,
            access_token: result.access_token,
        },
    ))
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponseData {
    pub user_id: i64,
    pub username: String,
    pub fullname: Option<String>,
    pub role: Role,
    pub access_token: String,
}
