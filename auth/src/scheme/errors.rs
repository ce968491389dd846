use thiserror::Error;

/// Error type for Authorization header parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Authorization header is missing")]
    Missing,

    #[error("Authorization header scheme is malformed")]
    MalformedScheme,

    #[error("credential payload is not valid base64")]
    BadEncoding,

    #[error("decoded credentials are malformed")]
    MalformedCredentials,
}
