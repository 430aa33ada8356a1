//! Salted password hashing.
//!
//! Stored format: `hex(SHA-256(password || salt))` followed directly by the
//! salt, itself a hex string. The hash portion is always 64 hex characters
//! (32 bytes), so `verify` splits at that fixed offset.

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Random salt length in bytes before hex encoding.
const SALT_BYTES: usize = 16;

/// Hex length of the SHA-256 digest portion of a stored hash.
const HASH_HEX_LEN: usize = 64;

/// Hash a password with a fresh random salt.
///
/// Two calls with the same password produce different strings; both verify.
#[must_use]
pub fn hash(password: &str) -> String {
    let mut salt_bytes = [0u8; SALT_BYTES];
    OsRng.fill_bytes(&mut salt_bytes);
    let salt = hex::encode(salt_bytes);

    let digest = digest_with_salt(password, &salt);
    format!("{digest}{salt}")
}

/// Verify a password against a stored hash string.
///
/// Malformed stored strings (too short to contain a digest) fail verification
/// rather than panicking.
#[must_use]
pub fn verify(password: &str, stored: &str) -> bool {
    let Some(stored_digest) = stored.get(..HASH_HEX_LEN) else {
        return false;
    };
    let Some(salt) = stored.get(HASH_HEX_LEN..) else {
        return false;
    };
    if salt.is_empty() {
        return false;
    }

    let computed = digest_with_salt(password, salt);
    constant_time_eq(computed.as_bytes(), stored_digest.as_bytes())
}

/// `hex(SHA-256(password || salt))`.
fn digest_with_salt(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
