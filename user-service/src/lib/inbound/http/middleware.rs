use auth::scheme::bearer_token;
use auth::scheme::BasicCredentials;
use auth::scheme::GateError;
use auth::AccessClaims;
use auth::Role;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Identity of the caller, extracted from a validated access token and
/// stored in request extensions for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
    pub fullname: String,
    pub role: Role,
}

impl From<&AccessClaims> for AuthenticatedUser {
    fn from(claims: &AccessClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username.clone(),
            fullname: claims.fullname.clone(),
            role: claims.role,
        }
    }
}

/// Gate for protected routes: validates the Bearer token and attaches the
/// caller's identity to the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(auth_header(&req)).map_err(|e| {
        let message = match e {
            GateError::Missing => "Missing token",
            _ => "Invalid token format",
        };
        unauthorized(message)
    })?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Access token rejected");
        unauthorized("Invalid or expired token")
    })?;

    req.extensions_mut().insert(AuthenticatedUser::from(&claims));

    Ok(next.run(req).await)
}

/// Gate for the login route: decodes the Basic credentials and attaches
/// them to the request for the handler's double-entry check.
pub async fn basic_auth(mut req: Request, next: Next) -> Result<Response, Response> {
    let credentials = BasicCredentials::from_header(auth_header(&req)).map_err(|e| {
        let message = match e {
            GateError::Missing => "Missing Authorization header",
            GateError::MalformedScheme => "Invalid Authorization header format",
            GateError::BadEncoding => "Invalid Basic Auth encoding",
            GateError::MalformedCredentials => "Invalid Basic Auth credentials",
        };
        unauthorized(message)
    })?;

    req.extensions_mut().insert(credentials);

    Ok(next.run(req).await)
}

fn auth_header(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

fn unauthorized(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}
