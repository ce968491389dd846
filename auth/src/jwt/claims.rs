use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Token lifetime used when the configured value is absent or non-positive.
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Flat authorization tag carried in every access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

/// Error for role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("role must be one of admin, user (got {0:?})")]
    Unknown(String),
}

/// Identity claims embedded in every issued access token.
///
/// The token is self-contained: validation needs no server-side lookup, and
/// invalidation happens only by expiry. A refreshed token carries the same
/// identity fields with `iat`/`exp` recomputed from the refresh instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub user_id: i64,
    pub username: String,
    pub fullname: String,
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    /// Build claims expiring `ttl_hours` from now.
    ///
    /// A non-positive `ttl_hours` falls back to [`DEFAULT_TTL_HOURS`].
    pub fn new(
        user_id: i64,
        username: impl Into<String>,
        fullname: impl Into<String>,
        role: Role,
        ttl_hours: i64,
    ) -> Self {
        let ttl_hours = if ttl_hours > 0 {
            ttl_hours
        } else {
            DEFAULT_TTL_HOURS
        };
        let now = Utc::now();
        let expiration = now + Duration::hours(ttl_hours);

        Self {
            user_id,
            username: username.into(),
            fullname: fullname.into(),
            role,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check if the token is expired at `current_timestamp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
