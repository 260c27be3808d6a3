mod common;

use auth::Audience;
use auth::Claims;
use auth::TokenCodec;
use common::login;
use common::TestHarness;
use identity_service::domain::auth::errors::AuthError;
use identity_service::domain::auth::models::Credential;
use identity_service::domain::user::models::RegisterUserCommand;
use identity_service::domain::user::models::UpdateProfileCommand;
use identity_service::domain::user::ports::IdentityServicePort;
use identity_service::domain::user::service::TokenLifetimes;
use identity_service::user::errors::IdentityError;

#[tokio::test]
async fn test_register_then_login_round_trip() {
    let harness = TestHarness::new();

    let user = harness
        .service
        .register(RegisterUserCommand::new(
            login("alice@example.com"),
            "pass_word!".to_string(),
        ))
        .await
        .expect("registration failed");

    assert!(user.is_active);
    assert!(!user.is_verified);
    assert!(!user.is_superuser);
    assert_eq!(harness.notifier.registered_count(), 1);

    let authenticated = harness
        .service
        .authenticate(&login("alice@example.com"), "pass_word!")
        .await
        .expect("authentication failed");

    assert_eq!(authenticated.id, user.id);
    assert!(authenticated.last_login_at.is_some());

    // The session token the login handlers would return resolves back to
    // the same account through both backends.
    let token = harness
        .authenticator
        .issue_session(&authenticated)
        .expect("session issuance failed");

    let via_bearer = harness
        .authenticator
        .resolve(&Credential::bearer(token.clone()))
        .await
        .expect("bearer resolution failed");
    assert_eq!(via_bearer.id, user.id);

    let via_cookie = harness
        .authenticator
        .resolve(&Credential::cookie(token))
        .await
        .expect("cookie resolution failed");
    assert_eq!(via_cookie.id, user.id);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let harness = TestHarness::new();

    harness
        .service
        .register(RegisterUserCommand::new(
            login("alice"),
            "pass_word!".to_string(),
        ))
        .await
        .expect("registration failed");

    let result = harness
        .service
        .register(RegisterUserCommand::new(
            login("alice"),
            "different_password".to_string(),
        ))
        .await;

    assert!(matches!(result, Err(IdentityError::AlreadyExists(_))));
    assert_eq!(harness.notifier.registered_count(), 1);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_login_are_identical() {
    let harness = TestHarness::new();

    harness
        .service
        .register(RegisterUserCommand::new(
            login("alice"),
            "pass_word!".to_string(),
        ))
        .await
        .expect("registration failed");

    let wrong_password = harness
        .service
        .authenticate(&login("alice"), "not_the_password")
        .await
        .unwrap_err();
    let unknown_login = harness
        .service
        .authenticate(&login("nobody"), "pass_word!")
        .await
        .unwrap_err();

    assert_eq!(wrong_password.to_string(), unknown_login.to_string());
}

#[tokio::test]
async fn test_password_reset_flow() {
    let harness = TestHarness::new();

    harness
        .service
        .register(RegisterUserCommand::new(
            login("alice"),
            "old_password!".to_string(),
        ))
        .await
        .expect("registration failed");

    harness
        .service
        .request_password_reset(&login("alice"))
        .await
        .expect("reset request failed");

    let token = harness
        .notifier
        .last_reset_token()
        .expect("no reset token published");

    harness
        .service
        .confirm_password_reset(&token, "new_password!")
        .await
        .expect("reset confirmation failed");

    let stale = harness
        .service
        .authenticate(&login("alice"), "old_password!")
        .await;
    assert!(matches!(stale, Err(IdentityError::InvalidCredentials)));

    harness
        .service
        .authenticate(&login("alice"), "new_password!")
        .await
        .expect("login with new password failed");
}

#[tokio::test]
async fn test_expired_reset_token_is_a_bad_token() {
    let harness = TestHarness::with_lifetimes(TokenLifetimes {
        reset_seconds: -60,
        verification_seconds: 3600,
    });

    harness
        .service
        .register(RegisterUserCommand::new(
            login("alice"),
            "pass_word!".to_string(),
        ))
        .await
        .expect("registration failed");

    harness
        .service
        .request_password_reset(&login("alice"))
        .await
        .expect("reset request failed");

    let token = harness
        .notifier
        .last_reset_token()
        .expect("no reset token published");

    let result = harness
        .service
        .confirm_password_reset(&token, "new_password!")
        .await;

    assert!(matches!(result, Err(IdentityError::BadToken)));
}

#[tokio::test]
async fn test_verification_token_is_not_a_reset_token() {
    let harness = TestHarness::new();

    harness
        .service
        .register(RegisterUserCommand::new(
            login("alice"),
            "pass_word!".to_string(),
        ))
        .await
        .expect("registration failed");

    harness
        .service
        .request_verification(&login("alice"))
        .await
        .expect("verification request failed");

    let token = harness
        .notifier
        .last_verification_token()
        .expect("no verification token published");

    let result = harness
        .service
        .confirm_password_reset(&token, "new_password!")
        .await;

    assert!(matches!(result, Err(IdentityError::BadToken)));
}

#[tokio::test]
async fn test_reset_request_for_unknown_login_is_silent() {
    let harness = TestHarness::new();

    harness
        .service
        .request_password_reset(&login("nobody"))
        .await
        .expect("request should succeed silently");

    assert_eq!(harness.notifier.reset_count(), 0);
}

#[tokio::test]
async fn test_verification_flow_and_replay() {
    let harness = TestHarness::new();

    harness
        .service
        .register(RegisterUserCommand::new(
            login("alice"),
            "pass_word!".to_string(),
        ))
        .await
        .expect("registration failed");

    harness
        .service
        .request_verification(&login("alice"))
        .await
        .expect("verification request failed");

    let token = harness
        .notifier
        .last_verification_token()
        .expect("no verification token published");

    let verified = harness
        .service
        .confirm_verification(&token)
        .await
        .expect("verification failed");
    assert!(verified.is_verified);

    // Replaying the same token is the one distinguishable failure.
    let replay = harness.service.confirm_verification(&token).await;
    assert!(matches!(replay, Err(IdentityError::AlreadyVerified)));

    // And further verification requests for the account are silent no-ops.
    harness
        .service
        .request_verification(&login("alice"))
        .await
        .expect("request should succeed silently");
    assert_eq!(harness.notifier.verification_count(), 1);
}

#[tokio::test]
async fn test_deactivated_account_is_locked_out() {
    let harness = TestHarness::new();

    let user = harness
        .service
        .register(RegisterUserCommand::new(
            login("alice"),
            "pass_word!".to_string(),
        ))
        .await
        .expect("registration failed");

    let session = harness
        .authenticator
        .issue_session(&user)
        .expect("session issuance failed");

    harness
        .service
        .deactivate_user(&user.id)
        .await
        .expect("deactivation failed");

    // Login looks like a bad credential.
    let result = harness
        .service
        .authenticate(&login("alice"), "pass_word!")
        .await;
    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));

    // An outstanding session fails the active gate even though the token
    // itself is still cryptographically valid.
    let gate = harness
        .authenticator
        .current_active_user(&Credential::bearer(session))
        .await;
    assert!(matches!(gate, Err(AuthError::Inactive)));

    // Reset requests for the account go quiet too.
    harness
        .service
        .request_password_reset(&login("alice"))
        .await
        .expect("request should succeed silently");
    assert_eq!(harness.notifier.reset_count(), 0);
}

#[tokio::test]
async fn test_privileged_registration_passes_superuser_gate() {
    let harness = TestHarness::new();

    let admin = harness
        .service
        .register(RegisterUserCommand::privileged(
            login("admin"),
            "pass_word!".to_string(),
        ))
        .await
        .expect("registration failed");
    assert!(admin.is_superuser);

    let session = harness
        .authenticator
        .issue_session(&admin)
        .expect("session issuance failed");

    harness
        .authenticator
        .current_superuser(&Credential::bearer(session))
        .await
        .expect("superuser gate failed");
}

#[tokio::test]
async fn test_forged_token_is_rejected() {
    let harness = TestHarness::new();

    let user = harness
        .service
        .register(RegisterUserCommand::new(
            login("alice"),
            "pass_word!".to_string(),
        ))
        .await
        .expect("registration failed");

    // Same claims, wrong signing key.
    let forged = TokenCodec::new(b"a-completely-different-signing-secret!!")
        .issue(&Claims::new(user.id, Audience::ResetPassword, 3600))
        .expect("issuing failed");

    let result = harness
        .service
        .confirm_password_reset(&forged, "new_password!")
        .await;
    assert!(matches!(result, Err(IdentityError::BadToken)));
}

#[tokio::test]
async fn test_profile_update_rehashes_password_and_renames() {
    let harness = TestHarness::new();

    let user = harness
        .service
        .register(RegisterUserCommand::new(
            login("alice"),
            "old_password!".to_string(),
        ))
        .await
        .expect("registration failed");

    let updated = harness
        .service
        .update_profile(
            &user.id,
            UpdateProfileCommand {
                login: Some(login("alice@example.com")),
                password: Some("new_password!".to_string()),
            },
        )
        .await
        .expect("update failed");
    assert_eq!(updated.login.as_str(), "alice@example.com");

    harness
        .service
        .authenticate(&login("alice@example.com"), "new_password!")
        .await
        .expect("login after update failed");
}

#[tokio::test]
async fn test_profile_update_to_taken_login_is_rejected() {
    let harness = TestHarness::new();

    harness
        .service
        .register(RegisterUserCommand::new(
            login("alice"),
            "pass_word!".to_string(),
        ))
        .await
        .expect("registration failed");

    let bob = harness
        .service
        .register(RegisterUserCommand::new(
            login("bob"),
            "pass_word!".to_string(),
        ))
        .await
        .expect("registration failed");

    let result = harness
        .service
        .update_profile(
            &bob.id,
            UpdateProfileCommand {
                login: Some(login("alice")),
                password: None,
            },
        )
        .await;

    assert!(matches!(result, Err(IdentityError::AlreadyExists(_))));
}
