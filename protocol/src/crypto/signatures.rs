//! # Digital Signatures
//!
//! Deterministic Curve25519 signatures over arbitrary messages.
//!
//! ```text
//! (P, s) = keygen(SHA256(phrase))
//! m      = SHA256(message)
//! x      = SHA256(m || s)          nonce, bound to message and key
//! Y      = keygen(x).public
//! h      = SHA256(m || Y)          challenge
//! v      = (x - h) s mod q
//! sig    = v || h
//! ```
//!
//! The nonce comes out of a hash, not an RNG, so a broken RNG can never leak
//! the key through a repeated nonce. Signing the same message twice gives
//! the same 64 bytes.
//!
//! Verification recomputes `Y = u(v·abs(P) + h·B)` and accepts iff
//! `SHA256(m || Y) == h`. The comparison is constant-time.
//!
//! ## Canonical encodings
//!
//! `v` and `v + q` verify identically, as do public keys that differ only in
//! bit 255. With `enforce_canonical` set, both are rejected up front so one
//! logical signature has exactly one byte encoding. Legacy call sites can
//! turn it off; new code should not.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::debug;

use super::curve::{Curve25519, CurveEngine};
use super::hash::{sha256, sha256_concat};
use super::keys::{PrivateKey, PublicKey};
use crate::config::{SIGNATURE_HALF_LENGTH, SIGNATURE_LENGTH};
use crate::error::CryptoError;

/// A 64-byte signature, `v || h`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    bytes: [u8; SIGNATURE_LENGTH],
}

/// Sign/verify orchestration over a [`CurveEngine`].
#[derive(Debug, Clone, Copy)]
pub struct SignatureScheme<E = Curve25519> {
    engine: E,
}

/// Sign `message` with the identity derived from `phrase`.
///
/// # Example
///
/// ```
/// use heat_crypto::crypto::{derive_public_key, sign, verify};
///
/// let phrase = "correct horse battery staple";
/// let sig = sign(b"hello", phrase).unwrap();
/// assert!(verify(&sig, b"hello", &derive_public_key(phrase), true));
/// ```
pub fn sign(message: &[u8], phrase: &str) -> Result<Signature, CryptoError> {
    SignatureScheme::new().sign(message, phrase)
}

/// Verify `signature` over `message` against `public_key`.
///
/// Returns `false` for every kind of failure. There is no error to handle.
pub fn verify(
    signature: &Signature,
    message: &[u8],
    public_key: &PublicKey,
    enforce_canonical: bool,
) -> bool {
    SignatureScheme::new().verify(signature, message, public_key, enforce_canonical)
}

impl SignatureScheme {
    /// Scheme over the default Curve25519 engine.
    pub fn new() -> Self {
        Self { engine: Curve25519 }
    }
}

impl Default for SignatureScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CurveEngine> SignatureScheme<E> {
    /// Scheme over a caller-supplied engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Sign `message` with the identity derived from `phrase`.
    pub fn sign(&self, message: &[u8], phrase: &str) -> Result<Signature, CryptoError> {
        self.sign_with_seed(message, &sha256(phrase.as_bytes()))
    }

    /// Sign with an already-derived private key.
    ///
    /// The private key is the clamped seed, and keygen clamps idempotently,
    /// so this is byte-identical to [`sign`](Self::sign) with the phrase.
    pub fn sign_with_private_key(
        &self,
        message: &[u8],
        private_key: &PrivateKey,
    ) -> Result<Signature, CryptoError> {
        self.sign_with_seed(message, private_key.as_bytes())
    }

    fn sign_with_seed(&self, message: &[u8], seed: &[u8; 32]) -> Result<Signature, CryptoError> {
        let key = self.engine.keygen(seed);
        let m = sha256(message);

        let x = self
            .engine
            .clamp(sha256_concat(&[&m[..], &key.signing_scalar[..]]));
        let y = self.engine.keygen(&x).public;

        let h = sha256_concat(&[&m[..], &y[..]]);
        let v = self.engine.sign(&h, &x, &key.signing_scalar)?;

        Ok(Signature::from_parts(&v, &h))
    }

    /// Verify `signature` over `message` against `public_key`.
    pub fn verify(
        &self,
        signature: &Signature,
        message: &[u8],
        public_key: &PublicKey,
        enforce_canonical: bool,
    ) -> bool {
        if enforce_canonical {
            if !self.engine.is_canonical_signature(signature.as_bytes()) {
                debug!("rejecting non-canonical signature");
                return false;
            }
            if !self.engine.is_canonical_public_key(public_key.as_bytes()) {
                debug!("rejecting non-canonical public key");
                return false;
            }
        }

        let h = signature.h();
        let Some(y) = self.engine.verify(&signature.v(), &h, public_key.as_bytes()) else {
            debug!("rejecting signature: public key is not a curve point");
            return false;
        };

        let m = sha256(message);
        let h2 = sha256_concat(&[&m[..], &y[..]]);
        bool::from(h2[..].ct_eq(&h[..]))
    }

    /// Verify raw wire bytes. Wrong lengths are just another `false`.
    pub fn verify_bytes(
        &self,
        signature: &[u8],
        message: &[u8],
        public_key: &[u8],
        enforce_canonical: bool,
    ) -> bool {
        let Ok(signature) = Signature::try_from_slice(signature) else {
            return false;
        };
        let Ok(public_key) = PublicKey::try_from_slice(public_key) else {
            return false;
        };
        self.verify(&signature, message, &public_key, enforce_canonical)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

impl Signature {
    /// Wrap 64 raw bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Assemble `v || h`.
    pub fn from_parts(v: &[u8; SIGNATURE_HALF_LENGTH], h: &[u8; SIGNATURE_HALF_LENGTH]) -> Self {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..SIGNATURE_HALF_LENGTH].copy_from_slice(v);
        bytes[SIGNATURE_HALF_LENGTH..].copy_from_slice(h);
        Self { bytes }
    }

    /// Length-checked construction from a slice.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; SIGNATURE_LENGTH] =
            slice.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: SIGNATURE_LENGTH,
                got: slice.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Parse a 128-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| CryptoError::Encoding(format!("signature is not hex: {e}")))?;
        Self::try_from_slice(&bytes)
    }

    /// The raw 64 bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    /// The scalar half.
    pub fn v(&self) -> [u8; SIGNATURE_HALF_LENGTH] {
        let mut v = [0u8; SIGNATURE_HALF_LENGTH];
        v.copy_from_slice(&self.bytes[..SIGNATURE_HALF_LENGTH]);
        v
    }

    /// The challenge half.
    pub fn h(&self) -> [u8; SIGNATURE_HALF_LENGTH] {
        let mut h = [0u8; SIGNATURE_HALF_LENGTH];
        h.copy_from_slice(&self.bytes[SIGNATURE_HALF_LENGTH..]);
        h
    }

    /// Hex-encoded form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// serde has no derive for [u8; 64]. Hex keeps JSON readable anyway.
impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Signature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{derive_public_key, KeyPair};

    const PHRASE: &str = "correct horse battery staple";

    /// Adds the group order q to the scalar half of a signature.
    fn add_group_order(v: [u8; 32]) -> [u8; 32] {
        const Q: [u8; 32] = [
            0xED, 0xD3, 0xF5, 0x5C, 0x1A, 0x63, 0x12, 0x58, 0xD6, 0x9C, 0xF7, 0xA2, 0xDE, 0xF9,
            0xDE, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x10,
        ];
        let mut out = [0u8; 32];
        let mut carry = 0u16;
        for i in 0..32 {
            let sum = v[i] as u16 + Q[i] as u16 + carry;
            out[i] = sum as u8;
            carry = sum >> 8;
        }
        out
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let sig = sign(b"hello", PHRASE).unwrap();
        assert!(verify(&sig, b"hello", &derive_public_key(PHRASE), true));
    }

    /// `"hello"` signed by fixed phrases. "alice" has a public key whose
    /// even-v point has an odd Edwards x, so it pins the negated-scalar branch.
    const KNOWN_SIGNATURES: [(&str, &str, &str); 2] = [
        (
            PHRASE,
            "8f14527a1df1ed2b418adf4c9bc71a9aed4e742836f5c5a9c70158bb6bcdc777",
            "cdee003c41628b96dbe08faf5637e77bb1384b1509b0023247d1a29c521d550b\
             eddd48ab1668f7c3e925b75b78c15be04ea578301a19edacb5ea7ee6be6cf159",
        ),
        (
            "alice",
            "2e8b2883c27b391359d7d0c15d00815a6693290a38dd8eba341cc07ddaa8ed4d",
            "e37f55a193fc10ba0f68e795c8a39872a053272bc50710395a2c9bcce2ae2d08\
             86f7213d4b3ef9541ed17f5f2dabe1b70b3bc82a17cd13f304ee6cb28d05a809",
        ),
    ];

    #[test]
    fn test_known_answer_signatures() {
        for (phrase, public_hex, signature_hex) in KNOWN_SIGNATURES {
            let sig = sign(b"hello", phrase).unwrap();
            assert_eq!(sig.to_hex(), signature_hex, "signature for {phrase:?}");

            let pk = PublicKey::from_hex(public_hex).unwrap();
            let pinned = Signature::from_hex(signature_hex).unwrap();
            assert!(verify(&pinned, b"hello", &pk, true));
            assert!(!verify(&pinned, b"hellp", &pk, true));
        }
    }

    #[test]
    fn test_signing_is_deterministic() {
        let a = sign(b"hello", PHRASE).unwrap();
        let b = sign(b"hello", PHRASE).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_phrase_and_private_key_sign_identically() {
        let kp = KeyPair::from_phrase(PHRASE);
        assert_eq!(kp.sign(b"hello").unwrap(), sign(b"hello", PHRASE).unwrap());
    }

    #[test]
    fn test_different_messages_give_different_signatures() {
        let a = sign(b"hello", PHRASE).unwrap();
        let b = sign(b"hellp", PHRASE).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_message() {
        let sig = sign(b"", PHRASE).unwrap();
        assert!(verify(&sig, b"", &derive_public_key(PHRASE), true));
    }

    #[test]
    fn test_wrong_message_fails() {
        let sig = sign(b"pay bob 10", PHRASE).unwrap();
        assert!(!verify(&sig, b"pay bob 11", &derive_public_key(PHRASE), true));
    }

    #[test]
    fn test_wrong_key_fails() {
        let sig = sign(b"hello", PHRASE).unwrap();
        assert!(!verify(&sig, b"hello", &derive_public_key("someone else"), true));
    }

    #[test]
    fn test_tampered_signature_fails() {
        let sig = sign(b"hello", PHRASE).unwrap();
        let pk = derive_public_key(PHRASE);
        for idx in [0usize, 17, 31, 32, 50, 63] {
            let mut bytes = *sig.as_bytes();
            bytes[idx] ^= 0x01;
            assert!(
                !verify(&Signature::from_bytes(bytes), b"hello", &pk, false),
                "flip at byte {idx} still verified"
            );
        }
    }

    #[test]
    fn test_non_canonical_scalar_only_passes_without_enforcement() {
        let sig = sign(b"hello", PHRASE).unwrap();
        let pk = derive_public_key(PHRASE);
        let malleated = Signature::from_parts(&add_group_order(sig.v()), &sig.h());

        assert_ne!(malleated, sig);
        assert!(!verify(&malleated, b"hello", &pk, true));
        assert!(verify(&malleated, b"hello", &pk, false));
    }

    #[test]
    fn test_non_canonical_public_key_only_passes_without_enforcement() {
        let sig = sign(b"hello", PHRASE).unwrap();
        let mut pk_bytes = *derive_public_key(PHRASE).as_bytes();
        pk_bytes[31] |= 0x80;
        let pk = PublicKey::from_bytes(pk_bytes);

        assert!(!verify(&sig, b"hello", &pk, true));
        assert!(verify(&sig, b"hello", &pk, false));
    }

    #[test]
    fn test_verify_bytes_rejects_bad_lengths() {
        let scheme = SignatureScheme::new();
        let sig = sign(b"hello", PHRASE).unwrap();
        let pk = derive_public_key(PHRASE);

        assert!(scheme.verify_bytes(sig.as_bytes(), b"hello", pk.as_bytes(), true));
        assert!(!scheme.verify_bytes(&sig.as_bytes()[..63], b"hello", pk.as_bytes(), true));
        assert!(!scheme.verify_bytes(sig.as_bytes(), b"hello", &pk.as_bytes()[..31], true));
    }

    #[test]
    fn test_explicit_engine_matches_default() {
        let scheme = SignatureScheme::with_engine(Curve25519);
        assert_eq!(
            scheme.sign(b"hello", PHRASE).unwrap(),
            sign(b"hello", PHRASE).unwrap()
        );
    }

    #[test]
    fn test_signature_parts() {
        let sig = sign(b"hello", PHRASE).unwrap();
        assert_eq!(Signature::from_parts(&sig.v(), &sig.h()), sig);
    }

    #[test]
    fn test_signature_serde_is_hex() {
        let sig = sign(b"hello", PHRASE).unwrap();
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, format!("\"{}\"", sig.to_hex()));
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn test_signature_from_hex_rejects_wrong_length() {
        assert!(matches!(
            Signature::from_hex("00ff"),
            Err(CryptoError::InvalidKeyLength { expected: 64, got: 2 })
        ));
    }
}
