use super::errors::GateError;

/// Extract the token from an Authorization header of the exact form
/// `Bearer <token>`.
///
/// Shape rules mirror [`super::BasicCredentials::from_header`]: exactly two
/// space-separated parts, scheme token `Bearer`. The token itself is not
/// validated here.
///
/// # Errors
/// * `Missing` - header absent or empty
/// * `MalformedScheme` - not two space-separated parts with scheme `Bearer`
pub fn bearer_token(header: Option<&str>) -> Result<&str, GateError> {
    let header = header.filter(|h| !h.is_empty()).ok_or(GateError::Missing)?;

    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(GateError::MalformedScheme);
    }

    Ok(parts[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_header() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(bearer_token(None), Err(GateError::Missing));
        assert_eq!(bearer_token(Some("")), Err(GateError::Missing));
    }

    #[test]
    fn test_malformed_scheme() {
        assert_eq!(bearer_token(Some("Basic abc")), Err(GateError::MalformedScheme));
        assert_eq!(bearer_token(Some("Bearer")), Err(GateError::MalformedScheme));
        assert_eq!(
            bearer_token(Some("Bearer a b")),
            Err(GateError::MalformedScheme)
        );
        // Double space yields an empty middle part
        assert_eq!(
            bearer_token(Some("Bearer  abc")),
            Err(GateError::MalformedScheme)
        );
    }
}
