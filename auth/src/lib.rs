//! Authentication building blocks for the user service
//!
//! Provides the security-sensitive pieces of the HTTP service in one
//! transport-free crate:
//! - Password hashing (Argon2id)
//! - Access token issuance and validation (HS256 JWT with typed claims)
//! - Authorization header scheme parsing (Basic and Bearer)
//! - Authentication coordination
//!
//! The HTTP layer adapts these primitives into middleware and handlers;
//! nothing in here touches the network or the database.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{AccessClaims, JwtHandler, Role};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = AccessClaims::new(1, "alice", "Alice Doe", Role::User, 24);
//! let token = handler.encode(&claims).unwrap();
//! let decoded = handler.decode(&token).unwrap();
//! assert_eq!(decoded.username, "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{AccessClaims, Authenticator, Role};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", 24);
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let claims = AccessClaims::new(1, "alice", "Alice Doe", Role::User, auth.ttl_hours());
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! // Validate token
//! let decoded = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.user_id, 1);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod scheme;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::AccessClaims;
pub use jwt::JwtHandler;
pub use jwt::Role;
pub use jwt::RoleError;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use scheme::BasicCredentials;
pub use scheme::GateError;
