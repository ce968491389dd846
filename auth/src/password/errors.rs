use thiserror::Error;

/// Error type for password operations.
///
/// Verification has no error variant: a malformed stored hash verifies
/// as `false` rather than surfacing a distinguishable failure.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
