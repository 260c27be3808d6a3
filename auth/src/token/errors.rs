use thiserror::Error;

/// Error type for signed-token operations.
///
/// Callers of `decode` generally collapse all four failure variants into a
/// single "invalid token" response; they stay distinguishable here for
/// diagnostics.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token audience does not match the expected operation")]
    AudienceMismatch,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
