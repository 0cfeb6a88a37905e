//! # Hashing and Form Signing
//!
//! The gateway authenticates each request by a SHA-512 digest over the
//! canonical form body concatenated directly with the merchant's pre-shared
//! key: no delimiter, no HMAC construction, just `SHA-512(body || key)`
//! rendered as lowercase hex. This is the wire contract of the remote
//! gateway and must match it byte for byte; the functions here exist so the
//! exact hashing semantics live in one place.

use sha2::{Digest, Sha512};

/// Computes the SHA-512 digest of the input.
///
/// Returns the 64-byte digest as a `Vec<u8>`. Callers that want hex should
/// use [`sha512_hex`] directly.
pub fn sha512(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha512::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-512 and renders the digest as lowercase hex.
///
/// Every byte becomes exactly two hex digits, zero-padded, so the output is
/// always 128 characters.
pub fn sha512_hex(data: &[u8]) -> String {
    hex::encode(sha512(data))
}

/// Signs a canonical form body with the merchant's pre-shared key.
///
/// The signing data is the body followed immediately by the key, hashed as
/// one message. The body must not already contain a `signature` field.
pub fn sign_form_body(body: &str, pre_shared_key: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(body.as_bytes());
    hasher.update(pre_shared_key.as_bytes());
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
