use thiserror::Error;

/// Rejection reasons from the authentication gate chain.
///
/// Distinguishable internally for logging and metrics; the transport layer
/// decides how much of the distinction survives into status codes.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Missing, invalid, or expired credential")]
    Unauthenticated,

    #[error("User is inactive")]
    Inactive,

    #[error("User is not verified")]
    Unverified,

    #[error("User is not a superuser")]
    NotSuperuser,

    #[error("Store error during credential resolution: {0}")]
    Store(String),
}
