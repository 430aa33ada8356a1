//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use persimmon_core::{Email, UserId, Username};

/// A marketplace user.
///
/// The password hash never appears on this type; repositories return it
/// separately on the login path only.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// User's display name, unique alongside the email.
    pub username: Username,
    /// Whether the user has admin privileges.
    pub is_admin: bool,
    /// Whether the user may list products for sale.
    pub is_seller: bool,
    /// Suspended users cannot log in until an admin lifts the suspension.
    pub is_suspended: bool,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    /// Opaque salted hash produced by the credential hasher.
    pub password_hash: String,
    pub is_admin: bool,
    pub is_seller: bool,
}
