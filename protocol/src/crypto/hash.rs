//! # Hashing Utilities
//!
//! The digests the crypto layer is built from:
//!
//! - **SHA-256** drives everything: phrase → seed, message digests, nonce
//!   derivation, the signature challenge, and the envelope key.
//! - **RIPEMD-160** is exposed for the higher layers that use it. Nothing in
//!   signing or encryption touches it.
//!
//! All functions return fixed-size arrays. The protocol never needs a
//! variable-length digest, so neither does the API.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::config::{HASH_OUTPUT_LENGTH, RIPEMD160_OUTPUT_LENGTH};

/// Compute the SHA-256 digest of `data`.
///
/// # Example
///
/// ```
/// use heat_crypto::crypto::sha256;
///
/// let hash = sha256(b"HEAT");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    Sha256::digest(data).into()
}

/// SHA-256 over the concatenation of `parts`, without allocating the
/// concatenation.
///
/// `sha256_concat(&[a, b]) == sha256(a || b)`. The signature scheme uses this
/// for `SHA256(m || s)` and `SHA256(m || Y)`.
pub fn sha256_concat(parts: &[&[u8]]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Compute the RIPEMD-160 digest of `data`.
pub fn ripemd160(data: &[u8]) -> [u8; RIPEMD160_OUTPUT_LENGTH] {
    Ripemd160::digest(data).into()
}

/// Fold a full 32-byte hash down to a 64-bit id.
///
/// Reads the first eight bytes as a little-endian integer. Account ids are
/// `full_hash_to_id(sha256(public_key))`.
pub fn full_hash_to_id(hash: &[u8; HASH_OUTPUT_LENGTH]) -> u64 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash[..8]);
    u64::from_le_bytes(head)
}
