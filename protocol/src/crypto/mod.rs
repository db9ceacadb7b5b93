//! # Cryptographic Primitives
//!
//! Everything the ledger needs to identify accounts, sign transactions, and
//! talk privately:
//!
//! - **Phrase-derived keys.** A secret phrase is the whole identity. Keys are
//!   rederived on demand and never stored.
//! - **KCDSA-style signatures** over Curve25519, with the public key kept as
//!   a plain X25519 u-coordinate so the same key also does Diffie-Hellman.
//! - **A secure channel**: static ECDH, SHA-256 key derivation, AES-256-CBC.
//! - **SHA-256 and RIPEMD-160**, plus the hash-to-id fold for account ids.
//!
//! The curve arithmetic lives behind [`CurveEngine`] and the block cipher
//! behind [`EnvelopeCipher`]. Nothing outside those two traits touches field
//! elements or cipher state.

pub mod curve;
pub mod encryption;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use curve::{Curve25519, CurveEngine, KeygenOutput};
pub use encryption::{decrypt, encrypt, Aes256Cbc, EnvelopeCipher, SecureChannel, ZERO_NONCE};
pub use hash::{full_hash_to_id, ripemd160, sha256, sha256_concat};
pub use keys::{
    derive_private_key, derive_public_key, phrase_from_bytes, shared_secret, KeyPair, PrivateKey,
    PublicKey,
};
pub use signatures::{sign, verify, Signature, SignatureScheme};
