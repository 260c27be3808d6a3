use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::events::PasswordResetRequestedEvent;
use crate::domain::user::events::UserRegisteredEvent;
use crate::domain::user::events::VerificationRequestedEvent;

/// Serializable envelope for all lifecycle notifications.
///
/// Infrastructure representation for the delivery channel (Kafka, etc.);
/// downstream consumers render the actual emails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "notification_type", rename_all = "snake_case")]
pub enum NotificationMessage {
    UserRegistered(UserRegisteredMessage),
    PasswordResetRequested(PasswordResetRequestedMessage),
    VerificationRequested(VerificationRequestedMessage),
}

/// Serializable message for the after-register hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegisteredMessage {
    pub event_id: String,
    pub user_id: String,
    pub login: String,
    pub registered_at: DateTime<Utc>,
}

impl From<&UserRegisteredEvent> for UserRegisteredMessage {
    fn from(event: &UserRegisteredEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            user_id: event.user_id.clone(),
            login: event.login.clone(),
            registered_at: event.registered_at,
        }
    }
}

impl From<&UserRegisteredEvent> for NotificationMessage {
    fn from(event: &UserRegisteredEvent) -> Self {
        NotificationMessage::UserRegistered(UserRegisteredMessage::from(event))
    }
}

/// Serializable message for the after-forgot-password hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequestedMessage {
    pub event_id: String,
    pub user_id: String,
    pub login: String,
    pub token: String,
    pub requested_at: DateTime<Utc>,
}

impl From<&PasswordResetRequestedEvent> for PasswordResetRequestedMessage {
    fn from(event: &PasswordResetRequestedEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            user_id: event.user_id.clone(),
            login: event.login.clone(),
            token: event.token.clone(),
            requested_at: event.requested_at,
        }
    }
}

impl From<&PasswordResetRequestedEvent> for NotificationMessage {
    fn from(event: &PasswordResetRequestedEvent) -> Self {
        NotificationMessage::PasswordResetRequested(PasswordResetRequestedMessage::from(event))
    }
}

/// Serializable message for the after-verification-request hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequestedMessage {
    pub event_id: String,
    pub user_id: String,
    pub login: String,
    pub token: String,
    pub requested_at: DateTime<Utc>,
}

impl From<&VerificationRequestedEvent> for VerificationRequestedMessage {
    fn from(event: &VerificationRequestedEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            user_id: event.user_id.clone(),
            login: event.login.clone(),
            token: event.token.clone(),
            requested_at: event.requested_at,
        }
    }
}

impl From<&VerificationRequestedEvent> for NotificationMessage {
    fn from(event: &VerificationRequestedEvent) -> Self {
        NotificationMessage::VerificationRequested(VerificationRequestedMessage::from(event))
    }
}
