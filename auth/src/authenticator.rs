use crate::jwt::AccessClaims;
use crate::jwt::JwtHandler;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token
/// issuance.
///
/// Stateless apart from the signing secret and configured token lifetime,
/// both immutable after construction; safe to share across requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    ttl_hours: i64,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `ttl_hours` - Token lifetime; non-positive values fall back to the
    ///   default at issuance
    pub fn new(jwt_secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            ttl_hours,
        }
    }

    /// Configured token lifetime in hours.
    pub fn ttl_hours(&self) -> i64 {
        self.ttl_hours
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - password does not match the stored hash
    /// * `Token` - token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        claims: &AccessClaims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.encode(claims)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    ///
    /// Used by the refresh flow, where the caller has already validated an
    /// existing token.
    ///
    /// # Errors
    /// * `TokenError` - token generation failed
    pub fn generate_token(&self, claims: &AccessClaims) -> Result<String, TokenError> {
        self.jwt_handler.encode(claims)
    }

    /// Validate and decode an access token.
    ///
    /// # Errors
    /// * `TokenError` - malformed, bad signature, or expired
    pub fn validate_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.jwt_handler.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::Role;

    fn authenticator() -> Authenticator {
        Authenticator::new(b"test_secret_key_at_least_32_bytes!", 24)
    }

    fn claims(auth: &Authenticator) -> AccessClaims {
        AccessClaims::new(1, "alice", "Alice Doe", Role::User, auth.ttl_hours())
    }

    #[test]
    fn test_authenticate_success() {
        let auth = authenticator();

        let password = "my_password";
        let hash = auth.hash_password(password).expect("Failed to hash password");

        let claims = claims(&auth);
        let result = auth
            .authenticate(password, &hash, &claims)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let decoded = auth
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let auth = authenticator();

        let hash = auth
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = auth.authenticate("wrong_password", &hash, &claims(&auth));
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_malformed_stored_hash() {
        let auth = authenticator();

        // A corrupted stored hash must look like a plain mismatch
        let result = auth.authenticate("my_password", "garbage", &claims(&auth));
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_refresh_recomputes_expiry_from_now() {
        let auth = authenticator();

        // Token issued an hour ago into a 24h TTL
        let mut original = claims(&auth);
        original.iat -= 60 * 60;
        original.exp -= 60 * 60;

        let renewed = AccessClaims::new(
            original.user_id,
            original.username.clone(),
            original.fullname.clone(),
            original.role,
            auth.ttl_hours(),
        );
        let token = auth.generate_token(&renewed).expect("Failed to issue token");
        let decoded = auth.validate_token(&token).expect("Failed to validate");

        // Identity fields unchanged, expiry pushed forward from now
        assert_eq!(decoded.user_id, original.user_id);
        assert_eq!(decoded.username, original.username);
        assert_eq!(decoded.fullname, original.fullname);
        assert_eq!(decoded.role, original.role);
        assert!(decoded.exp > original.exp);
    }

    #[test]
    fn test_validate_invalid_token() {
        let auth = authenticator();

        assert!(auth.validate_token("invalid.token.here").is_err());
    }
}
