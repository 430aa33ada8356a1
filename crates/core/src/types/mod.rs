//! Core type definitions.
//!
//! - [`id`] - Type-safe entity ID newtypes
//! - [`email`] - Validated email addresses
//! - [`username`] - Validated usernames
//! - [`status`] - Order status enum

pub mod email;
pub mod id;
pub mod status;
pub mod username;
