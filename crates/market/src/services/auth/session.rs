//! In-memory session store.
//!
//! Tokens are opaque UUID v4 strings mapped to an expiry and the email they
//! were issued for. Nothing persists across the process; expired entries are
//! evicted lazily when validated, never swept in the background.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Source of "now" for expiry decisions.
///
/// Production uses [`SystemClock`]; tests substitute a manual clock to step
/// time past `expires_at`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// One issued session.
#[derive(Debug, Clone)]
struct Session {
    user_email: String,
    expires_at: DateTime<Utc>,
}

/// Shared in-memory session store.
///
/// Operations take `&self`; the map sits behind a `Mutex` so a single store
/// can be shared by the auth service and the expiry watcher (and remains
/// correct if the core is ever hosted behind concurrent request handlers).
pub struct SessionStore {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    /// Default session lifetime.
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    /// Create a store with the given time-to-live and the system clock.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::new(ttl, Arc::new(SystemClock))
    }

    /// Create a store with an explicit clock (used by tests).
    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Issue a fresh token bound to `user_email`, expiring `ttl` from now.
    #[must_use]
    pub fn create_session(&self, user_email: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            user_email: user_email.to_owned(),
            expires_at: self.clock.now() + self.ttl,
        };

        self.lock().insert(token.clone(), session);
        token
    }

    /// Whether the token exists and has not expired.
    ///
    /// An expired entry is removed here; this is the only eviction path, so
    /// store growth is bounded by the churn of validation calls.
    pub fn validate_session(&self, token: &str) -> bool {
        let mut sessions = self.lock();

        let Some(session) = sessions.get(token) else {
            return false;
        };

        if self.clock.now() > session.expires_at {
            sessions.remove(token);
            return false;
        }

        true
    }

    /// Remove a token unconditionally. No-op if absent.
    pub fn invalidate_session(&self, token: &str) {
        self.lock().remove(token);
    }

    /// The email bound to a token, without touching expiry state.
    #[must_use]
    pub fn user_for_token(&self, token: &str) -> Option<String> {
        self.lock().get(token).map(|s| s.user_email.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A clock that only moves when told to.
    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(now),
            })
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn store_with_manual_clock() -> (SessionStore, Arc<ManualClock>) {
        let clock = ManualClock::starting_at(Utc::now());
        let store = SessionStore::new(Duration::hours(24), clock.clone());
        (store, clock)
    }

    #[test]
    fn test_valid_immediately_after_create() {
        let (store, _clock) = store_with_manual_clock();
        let token = store.create_session("user@example.com");
        assert!(store.validate_session(&token));
    }

    #[test]
    fn test_invalid_after_invalidate() {
        let (store, _clock) = store_with_manual_clock();
        let token = store.create_session("user@example.com");
        store.invalidate_session(&token);
        assert!(!store.validate_session(&token));
    }

    #[test]
    fn test_invalidate_absent_token_is_noop() {
        let (store, _clock) = store_with_manual_clock();
        store.invalidate_session("no-such-token");
    }

    #[test]
    fn test_expires_when_clock_passes_ttl() {
        let (store, clock) = store_with_manual_clock();
        let token = store.create_session("user@example.com");

        clock.advance(Duration::hours(23));
        assert!(store.validate_session(&token));

        clock.advance(Duration::hours(2));
        assert!(!store.validate_session(&token));
        // Evicted on that read: the binding is gone too.
        assert_eq!(store.user_for_token(&token), None);
    }

    #[test]
    fn test_user_for_token_does_not_evict() {
        let (store, clock) = store_with_manual_clock();
        let token = store.create_session("user@example.com");

        clock.advance(Duration::hours(48));
        // Lookup is expiry-blind by contract.
        assert_eq!(
            store.user_for_token(&token),
            Some("user@example.com".to_owned())
        );
    }

    #[test]
    fn test_tokens_are_unique() {
        let (store, _clock) = store_with_manual_clock();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(store.create_session("user@example.com")));
        }
    }

    #[test]
    fn test_unknown_token_invalid() {
        let (store, _clock) = store_with_manual_clock();
        assert!(!store.validate_session("not-a-token"));
    }
}
