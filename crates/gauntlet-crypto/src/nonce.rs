//! Nonce generation and constant-time comparison.

use rand::rngs::OsRng;
use rand::RngCore;

/// Default nonce size in random bytes (hex-encoded to twice this length).
pub const NONCE_BYTES: usize = 16;

/// Generate a cryptographically secure random nonce, hex-encoded.
///
/// The returned string has `2 * bytes` lowercase hex characters.
pub fn generate_nonce(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Compare two strings without leaking where they differ.
///
/// Inputs of differing length return `false` immediately, so length is
/// observable through timing. This is an accepted limitation: callers rely
/// on the fast-path rejection, and the values compared here (nonces,
/// fingerprints) have fixed, public lengths.
pub fn safe_compare(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
