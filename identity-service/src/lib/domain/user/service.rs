use std::sync::Arc;

use auth::Audience;
use auth::Claims;
use auth::PasswordHasher;
use auth::TokenCodec;
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::events::PasswordResetRequestedEvent;
use crate::domain::user::events::UserRegisteredEvent;
use crate::domain::user::events::VerificationRequestedEvent;
use crate::domain::user::models::LoginId;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::IdentityError;
use crate::user::ports::IdentityServicePort;
use crate::user::ports::NotificationPublisher;
use crate::user::ports::UserRepository;

/// Lifetimes for the single-use signed tokens, in seconds.
#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub reset_seconds: i64,
    pub verification_seconds: i64,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            reset_seconds: 3600,
            verification_seconds: 3600,
        }
    }
}

/// Credential lifecycle service.
///
/// Orchestrates registration, login verification, password reset, email
/// verification, and profile updates over the injected store and delivery
/// collaborators.
pub struct IdentityService<UR, NP>
where
    UR: UserRepository,
    NP: NotificationPublisher,
{
    repository: Arc<UR>,
    notifier: Arc<NP>,
    codec: Arc<TokenCodec>,
    hasher: PasswordHasher,
    lifetimes: TokenLifetimes,
}

impl<UR, NP> IdentityService<UR, NP>
where
    UR: UserRepository,
    NP: NotificationPublisher,
{
    /// Create a new identity service with injected dependencies.
    pub fn new(
        repository: Arc<UR>,
        notifier: Arc<NP>,
        codec: Arc<TokenCodec>,
        lifetimes: TokenLifetimes,
    ) -> Self {
        Self {
            repository,
            notifier,
            codec,
            hasher: PasswordHasher::new(),
            lifetimes,
        }
    }

    fn issue_token(&self, user: &User, audience: Audience) -> Result<String, IdentityError> {
        let lifetime = match audience {
            Audience::ResetPassword => self.lifetimes.reset_seconds,
            Audience::VerifyEmail => self.lifetimes.verification_seconds,
            Audience::Session => {
                return Err(IdentityError::Unknown(
                    "Session tokens are issued by the authenticator".to_string(),
                ))
            }
        };

        let mut claims = Claims::new(user.id, audience, lifetime);
        if audience == Audience::VerifyEmail {
            // Delivery needs the address; the signature binds it to the subject.
            claims = claims.with_extra("login", user.login.as_str());
        }

        self.codec
            .issue(&claims)
            .map_err(|e| IdentityError::Unknown(format!("Token issuance failed: {}", e)))
    }

    /// Decode a single-use token, collapsing every failure mode to
    /// `BadToken` and resolving its subject against the store.
    async fn resolve_token_subject(
        &self,
        token: &str,
        audience: Audience,
    ) -> Result<User, IdentityError> {
        let claims = self.codec.decode(token, audience).map_err(|e| {
            tracing::debug!(audience = %audience, reason = %e, "Rejected token");
            IdentityError::BadToken
        })?;

        let user_id = UserId::from_string(&claims.sub).map_err(|_| IdentityError::BadToken)?;

        self.repository
            .find_by_id(&user_id)
            .await?
            .ok_or(IdentityError::BadToken)
    }
}

#[async_trait]
impl<UR, NP> IdentityServicePort for IdentityService<UR, NP>
where
    UR: UserRepository,
    NP: NotificationPublisher,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, IdentityError> {
        if self
            .repository
            .find_by_login(&command.login)
            .await?
            .is_some()
        {
            return Err(IdentityError::AlreadyExists(command.login.to_string()));
        }

        let password_hash = self.hasher.hash(&command.password)?;

        let user = User {
            id: UserId::new(),
            login: command.login,
            password_hash,
            is_active: true,
            is_verified: false,
            is_superuser: command.privileged,
            created_at: Utc::now(),
            last_login_at: None,
        };

        // The store's uniqueness constraint closes the race between the
        // pre-check above and this insert.
        let created_user = self.repository.create(user).await.map_err(|e| match e {
            IdentityError::DuplicateLogin(login) => IdentityError::AlreadyExists(login),
            other => other,
        })?;

        let event = UserRegisteredEvent::new(&created_user);
        if let Err(e) = self.notifier.publish_registered(&event).await {
            tracing::error!(
                "Failed to publish Registered notification for user {}: {}",
                created_user.id,
                e
            );
        }

        Ok(created_user)
    }

    async fn authenticate(&self, login: &LoginId, password: &str) -> Result<User, IdentityError> {
        let Some(mut user) = self.repository.find_by_login(login).await? else {
            return Err(IdentityError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(IdentityError::InvalidCredentials);
        }

        // Deactivated accounts are indistinguishable from bad credentials.
        if !user.is_active {
            return Err(IdentityError::InvalidCredentials);
        }

        user.last_login_at = Some(Utc::now());
        match self.repository.update(user.clone()).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                // Best-effort touch; a failed timestamp write must not
                // reject a correct credential.
                tracing::warn!("Failed to touch last login for user {}: {}", user.id, e);
                Ok(user)
            }
        }
    }

    async fn request_password_reset(&self, login: &LoginId) -> Result<(), IdentityError> {
        let Some(user) = self.repository.find_by_login(login).await? else {
            return Ok(());
        };
        if !user.is_active {
            return Ok(());
        }

        let token = self.issue_token(&user, Audience::ResetPassword)?;

        let event = PasswordResetRequestedEvent::new(&user, token);
        if let Err(e) = self.notifier.publish_password_reset_requested(&event).await {
            tracing::error!(
                "Failed to publish PasswordResetRequested notification for user {}: {}",
                user.id,
                e
            );
        }

        Ok(())
    }

    async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let mut user = self
            .resolve_token_subject(token, Audience::ResetPassword)
            .await?;

        // Parity with the request step: an inactive subject looks exactly
        // like a bad token.
        if !user.is_active {
            return Err(IdentityError::BadToken);
        }

        user.password_hash = self.hasher.hash(new_password)?;
        self.repository.update(user).await?;

        Ok(())
    }

    async fn request_verification(&self, login: &LoginId) -> Result<(), IdentityError> {
        let Some(user) = self.repository.find_by_login(login).await? else {
            return Ok(());
        };
        // Already-verified and inactive accounts are silent no-ops; the
        // response never distinguishes them from a successful request.
        if user.is_verified || !user.is_active {
            return Ok(());
        }

        let token = self.issue_token(&user, Audience::VerifyEmail)?;

        let event = VerificationRequestedEvent::new(&user, token);
        if let Err(e) = self.notifier.publish_verification_requested(&event).await {
            tracing::error!(
                "Failed to publish VerificationRequested notification for user {}: {}",
                user.id,
                e
            );
        }

        Ok(())
    }

    async fn confirm_verification(&self, token: &str) -> Result<User, IdentityError> {
        let mut user = self
            .resolve_token_subject(token, Audience::VerifyEmail)
            .await?;

        // The one distinguishable replay: the token may still be
        // cryptographically valid, but the state transition already happened.
        if user.is_verified {
            return Err(IdentityError::AlreadyVerified);
        }

        user.is_verified = true;
        self.repository.update(user).await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, IdentityError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, IdentityError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))?;

        if let Some(new_login) = command.login {
            user.login = new_login;
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.hasher.hash(&new_password)?;
        }

        self.repository.update(user).await.map_err(|e| match e {
            IdentityError::DuplicateLogin(login) => IdentityError::AlreadyExists(login),
            other => other,
        })
    }

    async fn deactivate_user(&self, id: &UserId) -> Result<(), IdentityError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))?;

        user.is_active = false;
        self.repository.update(user).await?;

        Ok(())
    }
}
