//! Session key fingerprinting for operational visibility.
//!
//! Operators need to confirm which signing key a deployment picked up,
//! especially around rotations, without ever logging key material. The
//! fingerprint is a truncated SHA-256 digest of the signing half of the key,
//! logged once at startup.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 fingerprint of the key's signing material.
///
/// The first 8 bytes of the digest, hex encoded to a 16-character string.
/// Enough to tell keys apart in logs; not usable to recover the key.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use backend::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let key = Key::generate();
/// let fp = key_fingerprint(&key);
///
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.signing());
    let digest = hasher.finalize();
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
