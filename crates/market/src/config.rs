//! Marketplace configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MARKET_DATABASE_URL` - SQLite connection string (e.g. `sqlite://market.db`)
//!
//! ## Optional
//! - `MARKET_SESSION_TTL_HOURS` - Session lifetime in hours (default: 24).
//!   One TTL governs both the in-memory session store and any token the host
//!   persists across restarts; there is deliberately no second window.
//! - `MARKET_SESSION_CHECK_SECS` - Expiry watcher period in seconds
//!   (default: 300)

use secrecy::SecretString;
use thiserror::Error;

use crate::services::auth::session::SessionStore;
use crate::services::auth::watcher::DEFAULT_CHECK_INTERVAL;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Marketplace application configuration.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// SQLite database connection URL.
    pub database_url: SecretString,
    /// Session lifetime, shared by the store and the persisted-token layer.
    pub session_ttl: chrono::Duration,
    /// How often the expiry watcher re-checks the current session.
    pub session_check_interval: std::time::Duration,
}

impl MarketConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if a required variable is absent
    /// and `ConfigError::InvalidEnvVar` if a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require_env("MARKET_DATABASE_URL")?;

        let ttl_hours =
            optional_parsed("MARKET_SESSION_TTL_HOURS", SessionStore::DEFAULT_TTL_HOURS)?;
        if ttl_hours <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "MARKET_SESSION_TTL_HOURS".to_owned(),
                "must be positive".to_owned(),
            ));
        }

        let check_secs =
            optional_parsed("MARKET_SESSION_CHECK_SECS", DEFAULT_CHECK_INTERVAL.as_secs())?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            session_ttl: chrono::Duration::hours(ttl_hours),
            session_check_interval: std::time::Duration::from_secs(check_secs),
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn optional_parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_owned(), raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The TTL and watcher-period defaults are the session layer's own
    // constants; the config layer must not restate them as literals.
    #[test]
    fn test_absent_vars_fall_back_to_session_defaults() {
        let ttl = optional_parsed(
            "MARKET_TEST_UNSET_TTL_HOURS",
            SessionStore::DEFAULT_TTL_HOURS,
        )
        .expect("default ttl");
        assert_eq!(ttl, 24);

        let secs = optional_parsed(
            "MARKET_TEST_UNSET_CHECK_SECS",
            DEFAULT_CHECK_INTERVAL.as_secs(),
        )
        .expect("default period");
        assert_eq!(secs, 300);
    }
}
