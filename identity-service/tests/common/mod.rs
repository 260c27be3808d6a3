use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::TokenCodec;
use identity_service::domain::auth::service::Authenticator;
use identity_service::domain::user::events::PasswordResetRequestedEvent;
use identity_service::domain::user::events::UserRegisteredEvent;
use identity_service::domain::user::events::VerificationRequestedEvent;
use identity_service::domain::user::models::LoginId;
use identity_service::domain::user::models::User;
use identity_service::domain::user::models::UserId;
use identity_service::domain::user::ports::NotificationPublisher;
use identity_service::domain::user::ports::UserRepository;
use identity_service::domain::user::service::IdentityService;
use identity_service::domain::user::service::TokenLifetimes;
use identity_service::user::errors::IdentityError;
use identity_service::user::errors::NotificationError;
use uuid::Uuid;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-signing-at-least-32-bytes";

/// In-memory store enforcing the same login-uniqueness guarantee the
/// production schema does.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, IdentityError> {
        let mut users = self.users.lock().unwrap();

        if users.values().any(|u| u.login == user.login) {
            return Err(IdentityError::DuplicateLogin(
                user.login.as_str().to_string(),
            ));
        }

        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&id.0).cloned())
    }

    async fn find_by_login(&self, login: &LoginId) -> Result<Option<User>, IdentityError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.login == *login).cloned())
    }

    async fn update(&self, user: User) -> Result<User, IdentityError> {
        let mut users = self.users.lock().unwrap();

        if !users.contains_key(&user.id.0) {
            return Err(IdentityError::NotFound(user.id.to_string()));
        }

        if users
            .values()
            .any(|u| u.login == user.login && u.id != user.id)
        {
            return Err(IdentityError::DuplicateLogin(
                user.login.as_str().to_string(),
            ));
        }

        users.insert(user.id.0, user.clone());
        Ok(user)
    }
}

/// Captures published notifications so tests can pull the tokens a real
/// deployment would deliver out of band.
#[derive(Default)]
pub struct RecordingNotifier {
    pub registered: Mutex<Vec<UserRegisteredEvent>>,
    pub password_resets: Mutex<Vec<PasswordResetRequestedEvent>>,
    pub verifications: Mutex<Vec<VerificationRequestedEvent>>,
}

impl RecordingNotifier {
    pub fn last_reset_token(&self) -> Option<String> {
        self.password_resets
            .lock()
            .unwrap()
            .last()
            .map(|e| e.token.clone())
    }

    pub fn last_verification_token(&self) -> Option<String> {
        self.verifications
            .lock()
            .unwrap()
            .last()
            .map(|e| e.token.clone())
    }

    pub fn registered_count(&self) -> usize {
        self.registered.lock().unwrap().len()
    }

    pub fn reset_count(&self) -> usize {
        self.password_resets.lock().unwrap().len()
    }

    pub fn verification_count(&self) -> usize {
        self.verifications.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationPublisher for RecordingNotifier {
    async fn publish_registered(
        &self,
        event: &UserRegisteredEvent,
    ) -> Result<(), NotificationError> {
        self.registered.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn publish_password_reset_requested(
        &self,
        event: &PasswordResetRequestedEvent,
    ) -> Result<(), NotificationError> {
        self.password_resets.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn publish_verification_requested(
        &self,
        event: &VerificationRequestedEvent,
    ) -> Result<(), NotificationError> {
        self.verifications.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A fully wired service and authenticator sharing one store and codec.
pub struct TestHarness {
    pub service: IdentityService<InMemoryUserRepository, RecordingNotifier>,
    pub authenticator: Authenticator<InMemoryUserRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_lifetimes(TokenLifetimes::default())
    }

    pub fn with_lifetimes(lifetimes: TokenLifetimes) -> Self {
        let repository = Arc::new(InMemoryUserRepository::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let codec = Arc::new(TokenCodec::new(TEST_SECRET));

        let service = IdentityService::new(
            Arc::clone(&repository),
            Arc::clone(&notifier),
            Arc::clone(&codec),
            lifetimes,
        );
        let authenticator = Authenticator::new(repository, codec, 3600);

        Self {
            service,
            authenticator,
            notifier,
        }
    }
}

pub fn login(raw: &str) -> LoginId {
    LoginId::new(raw.to_string()).expect("valid login")
}
