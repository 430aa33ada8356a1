//! Database operations for the marketplace SQLite store.
//!
//! ## Tables
//!
//! - `users` - Accounts, credentials and admin/seller/suspension flags
//! - `products` - Seller listings with guarded `stock`
//! - `cart_items` - Per-user cart lines with price snapshots
//! - `orders` / `order_items` - Committed orders with immutable snapshots
//! - `reviews` - One review per (user, product), purchasers only
//!
//! # Migrations
//!
//! Migrations live in `crates/market/migrations/` and are embedded at compile
//! time via [`MIGRATOR`]; run them with:
//! ```bash
//! cargo run -p persimmon-cli -- migrate
//! ```

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

pub use cart::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

/// Embedded migrations for the marketplace schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors from the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unique-constraint conflict (duplicate email, username, review, ...).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The targeted row does not exist.
    #[error("not found")]
    NotFound,

    /// Stored data failed to parse back into a domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a SQLite connection pool with sensible defaults.
///
/// The database file is created if missing and foreign keys are enforced.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
