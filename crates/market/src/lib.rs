//! Persimmon Market - marketplace core.
//!
//! The application library behind the marketplace UI: authentication with an
//! in-memory session store, SQLite repositories for users, products, carts,
//! orders and reviews, and the checkout transaction that converts a cart
//! into an order atomically.
//!
//! # Architecture
//!
//! - Services are explicitly constructed over a shared [`sqlx::SqlitePool`]
//!   and passed by handle to the host; there are no process-wide singletons.
//! - Every operation returns a typed `Result`; the only asynchronous
//!   notification is the session-expiry watcher's `watch` channel.
//! - Atomicity of checkout is delegated to the SQLite transaction; the stock
//!   guard is the conditional `UPDATE ... WHERE stock >= ?` itself.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

pub use config::{ConfigError, MarketConfig};
pub use db::{MIGRATOR, RepositoryError, create_pool};
pub use services::auth::{AuthError, AuthService, SessionStore};
pub use services::checkout::{CheckoutError, CheckoutService};
