use std::sync::Arc;

use auth::Audience;
use auth::Claims;
use auth::TokenCodec;
use auth::TokenError;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Credential;
use crate::domain::auth::models::CredentialSource;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::IdentityError;
use crate::user::ports::UserRepository;

/// Turns an inbound credential into an authenticated user, layered with
/// account-state gates.
///
/// Both registered backends (bearer, cookie) carry the same signed session
/// token; the `CredentialSource` tag records where it was read from and
/// keeps the backend set closed. The gate chain runs in a fixed order,
/// short-circuiting on the first unmet predicate:
/// authenticated, active, verified (verification-gated routes only),
/// superuser (admin routes only).
pub struct Authenticator<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    codec: Arc<TokenCodec>,
    session_lifetime_seconds: i64,
}

impl<UR> Authenticator<UR>
where
    UR: UserRepository,
{
    pub fn new(
        repository: Arc<UR>,
        codec: Arc<TokenCodec>,
        session_lifetime_seconds: i64,
    ) -> Self {
        Self {
            repository,
            codec,
            session_lifetime_seconds,
        }
    }

    /// Issue a session token for a user who has already been authenticated
    /// by other means (password login). Used verbatim by the bearer backend
    /// and wrapped in a cookie by the cookie backend.
    ///
    /// # Errors
    /// * `TokenError` - Signing failed
    pub fn issue_session(&self, user: &User) -> Result<String, TokenError> {
        let claims = Claims::new(user.id, Audience::Session, self.session_lifetime_seconds)
            .with_extra("login", user.login.as_str());
        self.codec.issue(&claims)
    }

    /// Resolve a credential to its user. Gate 1 of the chain: any decode
    /// failure, malformed subject, or missing user is `Unauthenticated`.
    ///
    /// # Errors
    /// * `Unauthenticated` - Credential does not resolve to a user
    /// * `Store` - Persistence failure during subject lookup
    pub async fn resolve(&self, credential: &Credential) -> Result<User, AuthError> {
        let claims = match credential.source {
            // Both backends wrap the signed session token; the tag decides
            // where it was read from, not how it is validated.
            CredentialSource::Bearer | CredentialSource::Cookie => self
                .codec
                .decode(&credential.raw, Audience::Session)
                .map_err(|e| {
                    tracing::debug!(
                        backend = %credential.source,
                        reason = %e,
                        "Rejected session credential"
                    );
                    AuthError::Unauthenticated
                })?,
        };

        let user_id =
            UserId::from_string(&claims.sub).map_err(|_| AuthError::Unauthenticated)?;

        self.repository
            .find_by_id(&user_id)
            .await
            .map_err(store_error)?
            .ok_or(AuthError::Unauthenticated)
    }

    /// Gates 1-2: authenticated and active.
    pub async fn current_active_user(&self, credential: &Credential) -> Result<User, AuthError> {
        let user = self.resolve(credential).await?;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        Ok(user)
    }

    /// Gates 1-3: authenticated, active, and verified.
    pub async fn current_verified_user(
        &self,
        credential: &Credential,
    ) -> Result<User, AuthError> {
        let user = self.current_active_user(credential).await?;
        if !user.is_verified {
            return Err(AuthError::Unverified);
        }
        Ok(user)
    }

    /// Gates 1, 2, and 4: authenticated, active, and superuser.
    pub async fn current_superuser(&self, credential: &Credential) -> Result<User, AuthError> {
        let user = self.current_active_user(credential).await?;
        if !user.is_superuser {
            return Err(AuthError::NotSuperuser);
        }
        Ok(user)
    }
}

fn store_error(err: IdentityError) -> AuthError {
    AuthError::Store(err.to_string())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::LoginId;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, IdentityError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityError>;
            async fn find_by_login(&self, login: &LoginId) -> Result<Option<User>, IdentityError>;
            async fn update(&self, user: User) -> Result<User, IdentityError>;
        }
    }

    const SECRET: &[u8] = b"test-secret-key-for-signing-at-least-32-bytes";

    fn user(active: bool, verified: bool, superuser: bool) -> User {
        User {
            id: UserId::new(),
            login: LoginId::new("alice".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            is_active: active,
            is_verified: verified,
            is_superuser: superuser,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    fn authenticator(
        repository: MockTestUserRepository,
    ) -> Authenticator<MockTestUserRepository> {
        Authenticator::new(
            Arc::new(repository),
            Arc::new(TokenCodec::new(SECRET)),
            3600,
        )
    }

    fn repository_returning(user: User) -> MockTestUserRepository {
        let mut repository = MockTestUserRepository::new();
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .returning(move |_| Ok(Some(user.clone())));
        repository
    }

    #[tokio::test]
    async fn test_bearer_session_resolves() {
        let user = user(true, false, false);
        let user_id = user.id;
        let authenticator = authenticator(repository_returning(user.clone()));

        let token = authenticator.issue_session(&user).unwrap();
        let resolved = authenticator
            .resolve(&Credential::bearer(token))
            .await
            .unwrap();

        assert_eq!(resolved.id, user_id);
    }

    #[tokio::test]
    async fn test_cookie_session_resolves() {
        let user = user(true, false, false);
        let authenticator = authenticator(repository_returning(user.clone()));

        let token = authenticator.issue_session(&user).unwrap();
        let resolved = authenticator.resolve(&Credential::cookie(token)).await;

        assert!(resolved.is_ok());
    }

    #[tokio::test]
    async fn test_reset_token_is_not_a_session() {
        let user = user(true, false, false);
        let authenticator = authenticator(MockTestUserRepository::new());

        // Valid signature, wrong audience.
        let codec = TokenCodec::new(SECRET);
        let token = codec
            .issue(&Claims::new(user.id, Audience::ResetPassword, 3600))
            .unwrap();

        let result = authenticator.resolve(&Credential::bearer(token)).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_garbage_credential_is_unauthenticated() {
        let authenticator = authenticator(MockTestUserRepository::new());

        let result = authenticator
            .resolve(&Credential::bearer("not.a.token"))
            .await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_missing_subject_is_unauthenticated() {
        let user = user(true, false, false);
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));
        let authenticator = authenticator(repository);

        let token = authenticator.issue_session(&user).unwrap();
        let result = authenticator.resolve(&Credential::bearer(token)).await;

        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_inactive_gate() {
        let user = user(false, true, true);
        let authenticator = authenticator(repository_returning(user.clone()));

        let token = authenticator.issue_session(&user).unwrap();
        let result = authenticator
            .current_active_user(&Credential::bearer(token))
            .await;

        assert!(matches!(result, Err(AuthError::Inactive)));
    }

    #[tokio::test]
    async fn test_unverified_gate() {
        let user = user(true, false, false);
        let authenticator = authenticator(repository_returning(user.clone()));

        let token = authenticator.issue_session(&user).unwrap();
        let result = authenticator
            .current_verified_user(&Credential::bearer(token))
            .await;

        assert!(matches!(result, Err(AuthError::Unverified)));
    }

    #[tokio::test]
    async fn test_superuser_gate() {
        let user = user(true, true, false);
        let authenticator = authenticator(repository_returning(user.clone()));

        let token = authenticator.issue_session(&user).unwrap();
        let result = authenticator
            .current_superuser(&Credential::bearer(token))
            .await;

        assert!(matches!(result, Err(AuthError::NotSuperuser)));
    }

    #[tokio::test]
    async fn test_superuser_does_not_require_verification() {
        let user = user(true, false, true);
        let authenticator = authenticator(repository_returning(user.clone()));

        let token = authenticator.issue_session(&user).unwrap();
        let result = authenticator
            .current_superuser(&Credential::bearer(token))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_inactive_beats_superuser_in_gate_order() {
        let user = user(false, false, true);
        let authenticator = authenticator(repository_returning(user.clone()));

        let token = authenticator.issue_session(&user).unwrap();
        let result = authenticator
            .current_superuser(&Credential::bearer(token))
            .await;

        assert!(matches!(result, Err(AuthError::Inactive)));
    }
}
