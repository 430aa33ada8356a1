//! Integration tests for registration, login and session lifecycle.

mod common;

use std::sync::Arc;

use chrono::Duration;

use persimmon_market::db::UserRepository;
use persimmon_market::services::auth::{AuthError, AuthService, SessionStore};

use common::test_pool;

fn session_store() -> Arc<SessionStore> {
    Arc::new(SessionStore::with_ttl(Duration::hours(24)))
}

#[tokio::test]
async fn register_then_login_succeeds() {
    let pool = test_pool().await;
    let auth = AuthService::new(pool, session_store());

    let user = auth
        .register("alice@example.com", "alice", "password1")
        .await
        .expect("register");
    assert!(!user.is_admin);
    assert!(!user.is_suspended);

    let logged_in = auth
        .login("alice@example.com", "password1")
        .await
        .expect("login");
    assert_eq!(logged_in.id, user.id);
    assert!(auth.is_authenticated());
    assert_eq!(auth.current_user_id(), Some(user.id));
    assert_eq!(
        auth.current_user_email().map(|e| e.as_str().to_owned()),
        Some("alice@example.com".to_owned())
    );
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let pool = test_pool().await;
    let auth = AuthService::new(pool, session_store());

    let err = auth
        .register("not-an-email", "bob", "password1")
        .await
        .expect_err("should fail");
    assert!(matches!(err, AuthError::InvalidEmail(_)));
}

#[tokio::test]
async fn register_rejects_weak_passwords() {
    let pool = test_pool().await;
    let auth = AuthService::new(pool, session_store());

    // Has a digit but fewer than 8 characters.
    let err = auth
        .register("bob@example.com", "bob", "short1")
        .await
        .expect_err("too short");
    assert!(matches!(err, AuthError::WeakPassword(_)));

    // Long enough but no digit.
    let err = auth
        .register("bob@example.com", "bob", "longenoughpassword")
        .await
        .expect_err("no digit");
    assert!(matches!(err, AuthError::WeakPassword(_)));
}

#[tokio::test]
async fn register_rejects_duplicate_email_or_username() {
    let pool = test_pool().await;
    let auth = AuthService::new(pool, session_store());

    auth.register("carol@example.com", "carol", "password1")
        .await
        .expect("first registration");

    let err = auth
        .register("carol@example.com", "carol2", "password1")
        .await
        .expect_err("duplicate email");
    assert!(matches!(err, AuthError::UserAlreadyExists));

    let err = auth
        .register("carol2@example.com", "carol", "password1")
        .await
        .expect_err("duplicate username");
    assert!(matches!(err, AuthError::UserAlreadyExists));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let pool = test_pool().await;
    let auth = AuthService::new(pool, session_store());

    auth.register("dave@example.com", "dave", "password1")
        .await
        .expect("register");

    let unknown_user = auth
        .login("nobody@example.com", "password1")
        .await
        .expect_err("unknown user");
    let wrong_password = auth
        .login("dave@example.com", "wrongpass1")
        .await
        .expect_err("wrong password");

    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    // Same user-facing message for both cases.
    assert_eq!(unknown_user.to_string(), wrong_password.to_string());
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn suspended_account_gets_distinct_error() {
    let pool = test_pool().await;
    let auth = AuthService::new(pool.clone(), session_store());

    let user = auth
        .register("eve@example.com", "eve", "password1")
        .await
        .expect("register");
    UserRepository::new(&pool)
        .set_suspended(user.id, true)
        .await
        .expect("suspend");

    let err = auth
        .login("eve@example.com", "password1")
        .await
        .expect_err("suspended");
    assert!(matches!(err, AuthError::AccountSuspended));
    assert!(!auth.is_authenticated());

    // Lifting the suspension restores access.
    UserRepository::new(&pool)
        .set_suspended(user.id, false)
        .await
        .expect("unsuspend");
    auth.login("eve@example.com", "password1")
        .await
        .expect("login after unsuspend");
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn logout_clears_state_and_is_idempotent() {
    let pool = test_pool().await;
    let sessions = session_store();
    let auth = AuthService::new(pool, sessions.clone());

    auth.register("fred@example.com", "fred", "password1")
        .await
        .expect("register");
    auth.login("fred@example.com", "password1")
        .await
        .expect("login");

    let token = auth.session_token().expect("token held");
    assert!(sessions.validate_session(&token));

    auth.logout();
    assert!(!auth.is_authenticated());
    assert_eq!(auth.current_user_id(), None);
    assert!(!sessions.validate_session(&token));

    // Calling again with no active session is safe.
    auth.logout();
}

#[tokio::test]
async fn restore_session_rehydrates_identity() {
    let pool = test_pool().await;
    let sessions = session_store();

    let auth = AuthService::new(pool.clone(), sessions.clone());
    let user = auth
        .register("gina@example.com", "gina", "password1")
        .await
        .expect("register");
    auth.login("gina@example.com", "password1")
        .await
        .expect("login");
    let token = auth.session_token().expect("token held");

    // A fresh service sharing the store stands in for an app restart.
    let restarted = AuthService::new(pool, sessions);
    assert!(!restarted.is_authenticated());

    let restored = restarted
        .restore_session(&token)
        .await
        .expect("restore call");
    assert!(restored);
    assert!(restarted.is_authenticated());
    assert_eq!(restarted.current_user_id(), Some(user.id));
    assert_eq!(
        restarted.current_username().map(|u| u.as_str().to_owned()),
        Some("gina".to_owned())
    );
}

#[tokio::test]
async fn restore_with_invalid_token_is_noop() {
    let pool = test_pool().await;
    let auth = AuthService::new(pool, session_store());

    let restored = auth
        .restore_session("11111111-2222-3333-4444-555555555555")
        .await
        .expect("restore call");
    assert!(!restored);
    assert!(!auth.is_authenticated());
    assert_eq!(auth.current_user_id(), None);
}

#[tokio::test]
async fn new_login_shadows_state_but_keeps_old_token_alive() {
    let pool = test_pool().await;
    let sessions = session_store();
    let auth = AuthService::new(pool, sessions.clone());

    auth.register("henry@example.com", "henry", "password1")
        .await
        .expect("register");

    auth.login("henry@example.com", "password1")
        .await
        .expect("first login");
    let first_token = auth.session_token().expect("first token");

    auth.login("henry@example.com", "password1")
        .await
        .expect("second login");
    let second_token = auth.session_token().expect("second token");

    assert_ne!(first_token, second_token);
    // The shadowed token is not invalidated; it lives until its own expiry.
    assert!(sessions.validate_session(&first_token));
    assert!(sessions.validate_session(&second_token));
}
