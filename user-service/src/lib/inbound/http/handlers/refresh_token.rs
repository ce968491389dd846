use auth::AccessClaims;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Re-issue a token for an already-validated caller.
///
/// Identity fields are carried over unchanged; only `iat`/`exp` move. The
/// user store is not consulted, so a token stays refreshable until it
/// expires even if the account was deactivated in the meantime.
pub async fn refresh_token(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<RefreshTokenResponseData>, ApiError> {
    let claims = AccessClaims::new(
        user.user_id,
        user.username.clone(),
        user.fullname.clone(),
        user.role,
        state.authenticator.ttl_hours(),
    );

    let access_token = state
        .authenticator
        .generate_token(&claims)
        .map_err(|e| ApiError::internal("Failed to issue token", vec![e.to_string()]))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Token refreshed",
        RefreshTokenResponseData { access_token },
    ))
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshTokenResponseData {
    pub access_token: String,
}
