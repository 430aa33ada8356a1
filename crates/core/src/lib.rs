//! Shared types for Persimmon Market.
//!
//! This crate contains the domain vocabulary used across the workspace:
//! type-safe entity IDs, validated email and username types, and the order
//! status enum. It performs no I/O.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::email::{Email, EmailError};
pub use types::id::{CartItemId, OrderId, ProductId, ReviewId, UserId};
pub use types::status::OrderStatus;
pub use types::username::{Username, UsernameError};
