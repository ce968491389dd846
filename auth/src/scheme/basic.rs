use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::errors::GateError;

/// Username/password pair decoded from a `Basic` Authorization header.
///
/// Transient: compared against the login request body and the stored hash,
/// never persisted or logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Parse an Authorization header of the exact form `Basic <base64>`.
    ///
    /// The decoded payload is split on the first `:`, so passwords may
    /// themselves contain colons.
    ///
    /// # Errors
    /// * `Missing` - header absent or empty
    /// * `MalformedScheme` - not two space-separated parts with scheme `Basic`
    /// * `BadEncoding` - payload is not valid base64 (or not UTF-8)
    /// * `MalformedCredentials` - decoded payload has no `:` separator
    pub fn from_header(header: Option<&str>) -> Result<Self, GateError> {
        let header = header.filter(|h| !h.is_empty()).ok_or(GateError::Missing)?;

        let parts: Vec<&str> = header.split(' ').collect();
        if parts.len() != 2 || parts[0] != "Basic" {
            return Err(GateError::MalformedScheme);
        }

        let decoded = STANDARD
            .decode(parts[1])
            .map_err(|_| GateError::BadEncoding)?;
        let decoded = String::from_utf8(decoded).map_err(|_| GateError::BadEncoding)?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or(GateError::MalformedCredentials)?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}
