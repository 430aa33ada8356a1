//! Periodic session-expiry watcher.
//!
//! The desktop flow re-checks session validity on a timer so the UI can drop
//! back to the login screen when the token lapses between user actions. Here
//! that is a tokio task running the same [`AuthService::is_authenticated`]
//! check on an interval and publishing transitions over a `watch` channel;
//! subscribers only ever see the latest value.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::AuthService;

/// How often the original checks session validity (5 minutes).
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(300);

/// Spawn the expiry watcher.
///
/// Returns the task handle and a receiver carrying the latest
/// "session currently valid" flag. The task ends on its own once every
/// receiver is dropped.
pub fn spawn_expiry_watcher(
    auth: Arc<AuthService>,
    period: Duration,
) -> (JoinHandle<()>, watch::Receiver<bool>) {
    let (tx, rx) = watch::channel(auth.is_authenticated());

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick fires immediately; the initial value already covers it.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let valid = auth.is_authenticated();
            if *tx.borrow() != valid {
                if !valid {
                    tracing::info!("session expired");
                }
                if tx.send(valid).is_err() {
                    break;
                }
            } else if tx.is_closed() {
                break;
            }
        }
    });

    (handle, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Utc};
    use sqlx::sqlite::SqlitePoolOptions;

    use crate::db::MIGRATOR;
    use crate::services::auth::session::{Clock, SessionStore};

    struct ManualClock {
        now: std::sync::Mutex<DateTime<Utc>>,
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    #[tokio::test]
    async fn test_watcher_reports_expiry_transition() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("pool");
        MIGRATOR.run(&pool).await.expect("migrations");

        let clock = Arc::new(ManualClock {
            now: std::sync::Mutex::new(Utc::now()),
        });
        let sessions = Arc::new(SessionStore::new(
            chrono::Duration::hours(24),
            clock.clone(),
        ));
        let auth = Arc::new(AuthService::new(pool, sessions));

        auth.register("watcher@example.com", "watcher", "password1")
            .await
            .expect("register");
        auth.login("watcher@example.com", "password1")
            .await
            .expect("login");

        // Pause only after the sqlite setup above: the pool connects on a real
        // blocking thread, and paused-time auto-advance would trip its acquire
        // timeout before the connection completes.
        tokio::time::pause();

        let (handle, mut rx) = spawn_expiry_watcher(auth.clone(), Duration::from_secs(300));
        assert!(*rx.borrow());

        // Push the session past its 24h expiry, then let the timer fire.
        *clock.now.lock().unwrap() += chrono::Duration::hours(25);
        tokio::time::advance(Duration::from_secs(301)).await;

        rx.changed().await.expect("watcher alive");
        assert!(!*rx.borrow());

        drop(rx);
        handle.abort();
    }
}
