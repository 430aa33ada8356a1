//! Authentication service.
//!
//! Orchestrates registration, login, logout and session restore over the
//! user repository, the credential hasher and the in-memory session store.
//! Operations return typed results; the one asynchronous notification (the
//! periodic expiry check) lives in [`watcher`].

mod error;
pub mod password;
pub mod session;
pub mod watcher;

pub use error::AuthError;
pub use session::{Clock, SessionStore, SystemClock};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sqlx::SqlitePool;

use persimmon_core::{Email, UserId, Username};

use crate::db::users::UserRepository;
use crate::models::user::{NewUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Cached state of the one active session this service tracks.
///
/// A fresh login overwrites this state but does not invalidate the previous
/// token in the session store; that token stays valid until its own expiry.
#[derive(Debug, Default)]
struct CurrentSession {
    authenticated: bool,
    email: Option<Email>,
    username: Option<Username>,
    user_id: Option<UserId>,
    token: Option<String>,
}

impl CurrentSession {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Authentication service.
///
/// Explicitly constructed and passed by handle to whatever hosts it; the
/// session store is shared so the expiry watcher and any session-restore path
/// see the same tokens.
pub struct AuthService {
    pool: SqlitePool,
    sessions: Arc<SessionStore>,
    current: Mutex<CurrentSession>,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(pool: SqlitePool, sessions: Arc<SessionStore>) -> Self {
        Self {
            pool,
            sessions,
            current: Mutex::new(CurrentSession::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CurrentSession> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new user with email, username and password.
    ///
    /// New accounts are neither admin nor seller and start unsuspended.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` / `AuthError::InvalidUsername` if a
    /// field fails validation, `AuthError::WeakPassword` if the password
    /// doesn't meet requirements, and `AuthError::UserAlreadyExists` if the
    /// email or username is taken.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let username = Username::parse(username)?;
        validate_password(password)?;

        let users = UserRepository::new(&self.pool);

        // Pre-check gives the friendly error; the unique constraint still
        // backs it up at insert time.
        if users.exists(&email, &username).await? {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = password::hash(password);
        let user = users
            .create(&NewUser {
                email,
                username,
                password_hash,
                is_admin: false,
                is_seller: false,
            })
            .await
            .map_err(|e| match e {
                crate::db::RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "registered new user");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// On success the service caches the user's identity, issues a session
    /// token and considers the session active.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or wrong
    /// password (indistinguishable by design) and `AuthError::AccountSuspended`
    /// for suspended accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let users = UserRepository::new(&self.pool);
        let Some((user, password_hash)) = users.password_hash_by_email(&email).await? else {
            tracing::debug!(%email, "login failed: no such user");
            return Err(AuthError::InvalidCredentials);
        };

        if user.is_suspended {
            tracing::warn!(user_id = %user.id, "login rejected: account suspended");
            return Err(AuthError::AccountSuspended);
        }

        if !password::verify(password, &password_hash) {
            tracing::debug!(user_id = %user.id, "login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.sessions.create_session(user.email.as_str());

        let mut state = self.state();
        state.authenticated = true;
        state.email = Some(user.email.clone());
        state.username = Some(user.username.clone());
        state.user_id = Some(user.id);
        state.token = Some(token);
        drop(state);

        tracing::info!(user_id = %user.id, "login successful");
        Ok(user)
    }

    /// Log out the current session.
    ///
    /// Invalidates the held token and clears all cached state. Idempotent;
    /// calling with no active session is safe.
    pub fn logout(&self) {
        let mut state = self.state();
        if let Some(token) = state.token.take() {
            self.sessions.invalidate_session(&token);
        }
        state.clear();
        drop(state);

        tracing::info!("user logged out");
    }

    /// Whether the current session is authenticated right now.
    ///
    /// Returns false immediately if no login state is cached; otherwise
    /// defers to the session store, so a locally-cached session that has
    /// expired reads as unauthenticated. This is the single source of truth
    /// for access decisions.
    pub fn is_authenticated(&self) -> bool {
        let state = self.state();
        if !state.authenticated || state.user_id.is_none() {
            return false;
        }
        let Some(token) = state.token.clone() else {
            return false;
        };
        drop(state);

        self.sessions.validate_session(&token)
    }

    /// Restore a session from a persisted token (application startup).
    ///
    /// If the store still validates the token, the cached identity is
    /// rehydrated from the user bound to it and the call returns `true`.
    /// An invalid or expired token leaves the service unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the user lookup fails.
    pub async fn restore_session(&self, token: &str) -> Result<bool, AuthError> {
        if !self.sessions.validate_session(token) {
            return Ok(false);
        }

        let Some(raw_email) = self.sessions.user_for_token(token) else {
            return Ok(false);
        };
        let email = Email::parse(&raw_email).map_err(|e| {
            crate::db::RepositoryError::DataCorruption(format!(
                "invalid email bound to session: {e}"
            ))
        })?;

        let users = UserRepository::new(&self.pool);
        let Some(user) = users.get_by_email(&email).await? else {
            // User vanished since the token was issued; drop the session.
            self.sessions.invalidate_session(token);
            return Ok(false);
        };

        let mut state = self.state();
        state.authenticated = true;
        state.email = Some(user.email);
        state.username = Some(user.username);
        state.user_id = Some(user.id);
        state.token = Some(token.to_owned());
        drop(state);

        tracing::info!(user_id = %user.id, "session restored");
        Ok(true)
    }

    /// ID of the currently authenticated user.
    ///
    /// Goes through the full [`Self::is_authenticated`] check, session
    /// validity included, so a stale cached ID is never handed out after the
    /// session has expired.
    #[must_use]
    pub fn current_user_id(&self) -> Option<UserId> {
        if !self.is_authenticated() {
            return None;
        }
        self.state().user_id
    }

    /// Email of the currently authenticated user.
    #[must_use]
    pub fn current_user_email(&self) -> Option<Email> {
        if !self.is_authenticated() {
            return None;
        }
        self.state().email.clone()
    }

    /// Username of the currently authenticated user.
    #[must_use]
    pub fn current_username(&self) -> Option<Username> {
        if !self.is_authenticated() {
            return None;
        }
        self.state().username.clone()
    }

    /// The active session token, for the host to persist across restarts.
    #[must_use]
    pub fn session_token(&self) -> Option<String> {
        self.state().token.clone()
    }

    /// The shared session store handle.
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }
}

/// Validate password meets requirements: at least 8 characters and one digit.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword(
            "password must contain at least one number".to_owned(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_accepts_good() {
        assert!(validate_password("abcdefg1").is_ok());
        assert!(validate_password("longer-password-42").is_ok());
    }

    #[test]
    fn test_validate_password_rejects_short() {
        // 7 chars with a digit is still too short.
        assert!(matches!(
            validate_password("short12"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_rejects_no_digit() {
        assert!(matches!(
            validate_password("longenoughpassword"),
            Err(AuthError::WeakPassword(_))
        ));
    }
}
