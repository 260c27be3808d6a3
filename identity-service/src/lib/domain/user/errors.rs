use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for LoginId validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Login identifier too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Login identifier too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Login identifier contains invalid characters (only alphanumeric, underscore, hyphen, and dot allowed)"
    )]
    InvalidCharacters,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
}

/// Error for notification publishing operations
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to serialize notification: {0}")]
    SerializationFailed(String),

    #[error("Failed to publish notification to broker: {0}")]
    PublishFailed(String),

    #[error("Connection to notification broker failed: {0}")]
    ConnectionFailed(String),
}

/// Top-level error for credential lifecycle operations.
///
/// `InvalidCredentials` and `BadToken` are deliberately under-specific:
/// they never say whether the account exists or which part of the
/// credential was wrong.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid login identifier: {0}")]
    InvalidLogin(#[from] LoginError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    // Domain-level errors
    #[error("A user with this login identifier already exists")]
    AlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    BadToken,

    #[error("User is already verified")]
    AlreadyVerified,

    #[error("User not found: {0}")]
    NotFound(String),

    // Store-level uniqueness violation; the service folds this into
    // `AlreadyExists` so the register race and the pre-check agree.
    #[error("Login identifier already present in store: {0}")]
    DuplicateLogin(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        IdentityError::Unknown(err.to_string())
    }
}
