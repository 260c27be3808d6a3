use async_trait::async_trait;

use crate::domain::user::events::PasswordResetRequestedEvent;
use crate::domain::user::events::UserRegisteredEvent;
use crate::domain::user::events::VerificationRequestedEvent;
use crate::domain::user::models::LoginId;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::IdentityError;
use crate::user::errors::NotificationError;

/// Port for credential lifecycle operations.
///
/// Each operation is atomic and independently invocable; none spans two
/// store writes that could expose an invalid intermediate state.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Errors
    /// * `AlreadyExists` - Login identifier is taken (pre-check or store race)
    /// * `Database` - Store operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, IdentityError>;

    /// Verify a login identifier and password pair.
    ///
    /// Unknown login, wrong password, and deactivated account all fail with
    /// the identical `InvalidCredentials` value. On success the last-login
    /// timestamp is touched best-effort.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Pair does not resolve to an active account
    /// * `Database` - Store operation failed
    async fn authenticate(&self, login: &LoginId, password: &str) -> Result<User, IdentityError>;

    /// Request a password reset.
    ///
    /// Always succeeds from the caller's perspective. A reset token is
    /// issued and handed to the delivery collaborator only when the account
    /// exists and is active.
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn request_password_reset(&self, login: &LoginId) -> Result<(), IdentityError>;

    /// Consume a reset token and set a new password.
    ///
    /// # Errors
    /// * `BadToken` - Any decode failure, unknown subject, or inactive account
    /// * `Database` - Store operation failed
    async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), IdentityError>;

    /// Request an email-verification token.
    ///
    /// Always succeeds from the caller's perspective; silent no-op for
    /// missing, inactive, or already-verified accounts.
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn request_verification(&self, login: &LoginId) -> Result<(), IdentityError>;

    /// Consume a verification token and mark the account verified.
    ///
    /// # Errors
    /// * `BadToken` - Any decode failure or unknown subject
    /// * `AlreadyVerified` - Replay against an already-verified account
    /// * `Database` - Store operation failed
    async fn confirm_verification(&self, token: &str) -> Result<User, IdentityError>;

    /// Retrieve a user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Store operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, IdentityError>;

    /// Update a user's own fields; only fields present in the command are
    /// touched, and a new password is hashed before writing.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `AlreadyExists` - New login identifier is taken
    /// * `Database` - Store operation failed
    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, IdentityError>;

    /// Deactivate a user (`is_active = false`). The soft substitute for
    /// deletion; the record itself is never removed.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Store operation failed
    async fn deactivate_user(&self, id: &UserId) -> Result<(), IdentityError>;
}

/// Persistence operations for the user aggregate.
///
/// These calls are the only suspension points of the system; everything
/// above them is in-memory computation.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `DuplicateLogin` - Login identifier already present (store-level
    ///   uniqueness, closing the check-then-insert race)
    /// * `Database` - Store operation failed
    async fn create(&self, user: User) -> Result<User, IdentityError>;

    /// Retrieve a user by identifier.
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityError>;

    /// Retrieve a user by login identifier.
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find_by_login(&self, login: &LoginId) -> Result<Option<User>, IdentityError>;

    /// Replace an existing user record; mutated fields are decided by the
    /// caller.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DuplicateLogin` - New login identifier already present
    /// * `Database` - Store operation failed
    async fn update(&self, user: User) -> Result<User, IdentityError>;
}

/// Delivery collaborator for lifecycle notifications.
///
/// Implementations are invoked fire-and-forget: the service logs and
/// swallows errors rather than failing the triggering operation.
#[async_trait]
pub trait NotificationPublisher: Send + Sync + 'static {
    /// Publish the after-register notification.
    async fn publish_registered(
        &self,
        event: &UserRegisteredEvent,
    ) -> Result<(), NotificationError>;

    /// Publish the after-forgot-password notification (carries the token).
    async fn publish_password_reset_requested(
        &self,
        event: &PasswordResetRequestedEvent,
    ) -> Result<(), NotificationError>;

    /// Publish the after-verification-request notification (carries the token).
    async fn publish_verification_requested(
        &self,
        event: &VerificationRequestedEvent,
    ) -> Result<(), NotificationError>;
}
