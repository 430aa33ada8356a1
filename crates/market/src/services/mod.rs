//! Service layer.
//!
//! - [`auth`] - Registration, login, sessions, the expiry watcher
//! - [`checkout`] - Cart maintenance and the cart-to-order transaction

pub mod auth;
pub mod checkout;
