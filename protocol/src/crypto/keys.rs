//! # Key Management
//!
//! Deterministic keypairs derived from a secret phrase.
//!
//! ```text
//! seed        = SHA256(utf8(phrase))
//! public_key  = keygen(seed).public       (Curve25519 u-coordinate)
//! private_key = clamp(seed)               (X25519 scalar)
//! ```
//!
//! The same phrase always yields the same pair. There is no stored key
//! file; the phrase *is* the identity. The public key doubles as the X25519
//! key for the secure channel, and hashes down to the numeric account id.
//!
//! ## Security considerations
//!
//! - [`PrivateKey`] has no `Serialize` impl and its `Debug` output is redacted.
//!   Exporting it takes an explicit call to [`PrivateKey::to_bytes`].
//! - Key bytes are never logged anywhere in this crate.
//! - [`PrivateKey`] is zeroized on drop.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::curve::{Curve25519, CurveEngine};
use super::hash::{full_hash_to_id, sha256};
use super::signatures::{Signature, SignatureScheme};
use crate::config::{PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, SHARED_SECRET_LENGTH};
use crate::error::CryptoError;

/// A Curve25519 public key. Safe to share, log, and put on-chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

/// A clamped Curve25519 private scalar. Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; PRIVATE_KEY_LENGTH],
}

/// A phrase-derived identity.
///
/// # Examples
///
/// ```
/// use heat_crypto::crypto::KeyPair;
///
/// let kp = KeyPair::from_phrase("correct horse battery staple");
/// let sig = kp.sign(b"hello").unwrap();
/// assert!(kp.public_key().verify(b"hello", &sig));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    public_key: PublicKey,
    private_key: PrivateKey,
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive the public key for `phrase` with the default engine.
pub fn derive_public_key(phrase: &str) -> PublicKey {
    derive_public_key_with(&Curve25519, phrase)
}

/// Derive the private key for `phrase` with the default engine.
pub fn derive_private_key(phrase: &str) -> PrivateKey {
    derive_private_key_with(&Curve25519, phrase)
}

/// Derive the public key for `phrase` with an explicit engine.
pub fn derive_public_key_with<E: CurveEngine + ?Sized>(engine: &E, phrase: &str) -> PublicKey {
    let seed = sha256(phrase.as_bytes());
    PublicKey::from_bytes(engine.keygen(&seed).public)
}

/// Derive the private key for `phrase` with an explicit engine.
pub fn derive_private_key_with<E: CurveEngine + ?Sized>(engine: &E, phrase: &str) -> PrivateKey {
    let seed = sha256(phrase.as_bytes());
    PrivateKey::from_bytes(engine.clamp(seed))
}

/// Interpret raw bytes as a secret phrase.
///
/// Phrases arriving from files or sockets are bytes, not `str`. Anything that
/// is not valid UTF-8 is rejected rather than lossily repaired, since a
/// repaired phrase would silently derive a different identity.
pub fn phrase_from_bytes(bytes: &[u8]) -> Result<&str, CryptoError> {
    std::str::from_utf8(bytes)
        .map_err(|e| CryptoError::Encoding(format!("secret phrase is not valid UTF-8: {e}")))
}

/// Raw X25519 shared secret between `my_private` and `their_public`.
///
/// Symmetric: Alice's (private, Bob's public) equals Bob's (private, Alice's
/// public). Callers should hash this before using it as a key; the secure
/// channel does so.
pub fn shared_secret(
    my_private: &PrivateKey,
    their_public: &PublicKey,
) -> [u8; SHARED_SECRET_LENGTH] {
    Curve25519.dh(my_private.as_bytes(), their_public.as_bytes())
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

impl KeyPair {
    /// Derive both halves from a secret phrase.
    pub fn from_phrase(phrase: &str) -> Self {
        Self::from_phrase_with(&Curve25519, phrase)
    }

    /// Derive both halves with an explicit engine.
    pub fn from_phrase_with<E: CurveEngine + ?Sized>(engine: &E, phrase: &str) -> Self {
        Self {
            public_key: derive_public_key_with(engine, phrase),
            private_key: derive_private_key_with(engine, phrase),
        }
    }

    /// Derive from a phrase supplied as bytes. Fails on invalid UTF-8.
    pub fn from_phrase_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self::from_phrase(phrase_from_bytes(bytes)?))
    }

    /// The public half.
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// The private half. Handle with care.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Numeric account id of this identity.
    pub fn account_id(&self) -> u64 {
        self.public_key.account_id()
    }

    /// Sign `message` with this identity.
    ///
    /// Produces the same bytes as signing with the phrase itself: the private
    /// key is the clamped seed, and keygen clamps its input anyway.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, CryptoError> {
        SignatureScheme::new().sign_with_private_key(message, &self.private_key)
    }

    /// Shared secret with a peer.
    pub fn shared_secret(&self, their_public: &PublicKey) -> [u8; SHARED_SECRET_LENGTH] {
        shared_secret(&self.private_key, their_public)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair(pub={})", self.public_key.to_hex())
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

impl PublicKey {
    /// Wrap raw bytes. No validation; use the canonical check in
    /// `verify` if the bytes came off the wire.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Length-checked construction from a slice.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            slice.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_LENGTH,
                got: slice.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| CryptoError::Encoding(format!("public key is not hex: {e}")))?;
        Self::try_from_slice(&bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Hex-encoded form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// `full_hash_to_id(SHA256(public_key))`.
    pub fn account_id(&self) -> u64 {
        full_hash_to_id(&sha256(&self.bytes))
    }

    /// Verify `signature` over `message`, enforcing canonical encodings.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        SignatureScheme::new().verify(signature, message, self, true)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PublicKey::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

impl PrivateKey {
    /// Wrap raw scalar bytes. The caller is responsible for clamping.
    pub fn from_bytes(bytes: [u8; PRIVATE_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Length-checked construction from a slice.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; PRIVATE_KEY_LENGTH] =
            slice.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: PRIVATE_KEY_LENGTH,
                got: slice.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Borrow the scalar bytes.
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LENGTH] {
        &self.bytes
    }

    /// Export the scalar bytes. Don't log them.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.bytes
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}
