use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::LoginError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Identity record for one registered account. `password_hash` is always
/// the hasher's output, never a plaintext. Accounts are never hard-deleted;
/// `is_active = false` is the deletion substitute.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub login: LoginId,
    pub password_hash: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login identifier value type.
///
/// The unique, case-preserving string an account authenticates with: either
/// a username (alphanumeric plus `_ - .`) or an email address. Uniqueness
/// across accounts is enforced by the store, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginId(String);

impl LoginId {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 320;

    /// Create a validated login identifier.
    ///
    /// Anything containing `@` must parse as an RFC 5322 email address;
    /// everything else is validated as a username.
    ///
    /// # Errors
    /// * `TooShort` / `TooLong` - Length outside 3-320 characters
    /// * `InvalidEmail` - Contains `@` but is not a well-formed address
    /// * `InvalidCharacters` - Username with characters outside the allowed set
    pub fn new(login: String) -> Result<Self, LoginError> {
        let login = Self::with_valid_length(login)?;

        if login.contains('@') {
            email_address::EmailAddress::from_str(&login)
                .map_err(|e| LoginError::InvalidEmail(e.to_string()))?;
            Ok(Self(login))
        } else if login
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            Ok(Self(login))
        } else {
            Err(LoginError::InvalidCharacters)
        }
    }

    fn with_valid_length(login: String) -> Result<String, LoginError> {
        let length = login.len();
        if length < Self::MIN_LENGTH {
            Err(LoginError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(LoginError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(login)
        }
    }

    /// Get the login identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new user with domain types.
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub login: LoginId,
    pub password: String,
    /// Privileged callers (startup bootstrap, admin tooling) may create
    /// superuser accounts; self-registration never sets this.
    pub privileged: bool,
}

impl RegisterUserCommand {
    pub fn new(login: LoginId, password: String) -> Self {
        Self {
            login,
            password,
            privileged: false,
        }
    }

    pub fn privileged(login: LoginId, password: String) -> Self {
        Self {
            login,
            password,
            privileged: true,
        }
    }
}

/// Command to update an existing user with optional validated fields.
///
/// Only provided fields are touched. A password, when present, is hashed by
/// the service before anything is written.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub login: Option<LoginId>,
    pub password: Option<String>,
}
