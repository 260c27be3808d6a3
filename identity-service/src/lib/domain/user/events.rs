use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::User;

/// Raised after a successful registration, typically to kick off a
/// verification-request flow downstream.
#[derive(Debug, Clone)]
pub struct UserRegisteredEvent {
    pub event_id: String,
    pub user_id: String,
    pub login: String,
    pub registered_at: DateTime<Utc>,
}

impl UserRegisteredEvent {
    pub fn new(user: &User) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            user_id: user.id.to_string(),
            login: user.login.as_str().to_string(),
            registered_at: user.created_at,
        }
    }
}

/// Raised after a password-reset request for an existing active account.
///
/// Carries the single-use reset token for the delivery collaborator; the
/// token never appears in the HTTP response.
#[derive(Debug, Clone)]
pub struct PasswordResetRequestedEvent {
    pub event_id: String,
    pub user_id: String,
    pub login: String,
    pub token: String,
    pub requested_at: DateTime<Utc>,
}

impl PasswordResetRequestedEvent {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            user_id: user.id.to_string(),
            login: user.login.as_str().to_string(),
            token,
            requested_at: Utc::now(),
        }
    }
}

/// Raised after a verification request for an existing, active, not yet
/// verified account. Carries the verification token for delivery.
#[derive(Debug, Clone)]
pub struct VerificationRequestedEvent {
    pub event_id: String,
    pub user_id: String,
    pub login: String,
    pub token: String,
    pub requested_at: DateTime<Utc>,
}

impl VerificationRequestedEvent {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            user_id: user.id.to_string(),
            login: user.login.as_str().to_string(),
            token,
            requested_at: Utc::now(),
        }
    }
}
