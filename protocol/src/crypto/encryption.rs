//! # Secure Channel
//!
//! Static-ECDH encryption between two phrase-derived identities.
//!
//! ```text
//! shared = X25519(my_private, their_public)
//! shared ^= nonce                         all-zero nonce by default
//! key    = SHA256(shared)
//! iv     = 16 fresh random bytes
//! out    = iv || AES-256-CBC(key, iv, PKCS7(plaintext))
//! ```
//!
//! Both parties derive the same key from their own private key and the
//! other's public key, so no handshake round trip is needed. The flip side is
//! no forward secrecy: whoever learns a private key can read every envelope
//! that key ever touched.
//!
//! The nonce lets one pair of identities run several independent channels
//! without new keys. Leave it zeroed if you don't need that.
//!
//! ## Wire format
//!
//! `IV (16 bytes) || ciphertext`. The ciphertext is always a non-empty
//! multiple of 16 bytes because PKCS#7 adds a full block when the plaintext
//! is already aligned. An empty plaintext encrypts to 32 bytes.
//!
//! ## Randomness
//!
//! The IV source is a parameter. Production code uses [`encrypt`], which
//! draws from `OsRng`; tests and simulations can pass a seeded generator to
//! [`SecureChannel::encrypt_with_rng`] and get reproducible envelopes.
//!
//! CBC without a MAC is malleable. Authenticity comes from the signature
//! layer above, not from here.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use tracing::debug;
use zeroize::Zeroizing;

use super::curve::{Curve25519, CurveEngine};
use super::hash::sha256;
use super::keys::{PrivateKey, PublicKey};
use crate::config::{AES_BLOCK_SIZE, AES_IV_LENGTH, AES_KEY_LENGTH, CHANNEL_NONCE_LENGTH};
use crate::error::CryptoError;

/// The default channel nonce. XOR with zero is a no-op.
pub const ZERO_NONCE: [u8; CHANNEL_NONCE_LENGTH] = [0u8; CHANNEL_NONCE_LENGTH];

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Block cipher capability used to seal envelopes.
pub trait EnvelopeCipher {
    /// Encrypt and pad. Output length is a non-zero multiple of the block size.
    fn encrypt(
        &self,
        key: &[u8; AES_KEY_LENGTH],
        iv: &[u8; AES_IV_LENGTH],
        plaintext: &[u8],
    ) -> Vec<u8>;

    /// Decrypt and unpad. Bad padding is [`CryptoError::InvalidCiphertext`].
    fn decrypt(
        &self,
        key: &[u8; AES_KEY_LENGTH],
        iv: &[u8; AES_IV_LENGTH],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;
}

/// AES-256 in CBC mode with PKCS#7 padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aes256Cbc;

impl EnvelopeCipher for Aes256Cbc {
    fn encrypt(
        &self,
        key: &[u8; AES_KEY_LENGTH],
        iv: &[u8; AES_IV_LENGTH],
        plaintext: &[u8],
    ) -> Vec<u8> {
        Aes256CbcEnc::new(&(*key).into(), &(*iv).into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
    }

    fn decrypt(
        &self,
        key: &[u8; AES_KEY_LENGTH],
        iv: &[u8; AES_IV_LENGTH],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        Aes256CbcDec::new(&(*key).into(), &(*iv).into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::InvalidCiphertext)
    }
}

/// ECDH-keyed envelope encryption over a curve engine and a block cipher.
#[derive(Debug, Clone, Copy)]
pub struct SecureChannel<E = Curve25519, C = Aes256Cbc> {
    engine: E,
    cipher: C,
}

/// Encrypt `plaintext` for `their_public` with the all-zero nonce and `OsRng`.
///
/// # Example
///
/// ```
/// use heat_crypto::crypto::{decrypt, encrypt, KeyPair};
///
/// let alice = KeyPair::from_phrase("alice");
/// let bob = KeyPair::from_phrase("bob");
///
/// let envelope = encrypt(b"meet at noon", alice.private_key(), &bob.public_key()).unwrap();
/// let opened = decrypt(&envelope, bob.private_key(), &alice.public_key()).unwrap();
/// assert_eq!(opened, b"meet at noon");
/// ```
pub fn encrypt(
    plaintext: &[u8],
    my_private: &PrivateKey,
    their_public: &PublicKey,
) -> Result<Vec<u8>, CryptoError> {
    SecureChannel::new().encrypt(plaintext, my_private, their_public, &ZERO_NONCE)
}

/// Decrypt an envelope from `their_public` with the all-zero nonce.
pub fn decrypt(
    envelope: &[u8],
    my_private: &PrivateKey,
    their_public: &PublicKey,
) -> Result<Vec<u8>, CryptoError> {
    SecureChannel::new().decrypt(envelope, my_private, their_public, &ZERO_NONCE)
}

impl SecureChannel {
    /// Channel over Curve25519 and AES-256-CBC.
    pub fn new() -> Self {
        Self {
            engine: Curve25519,
            cipher: Aes256Cbc,
        }
    }
}

impl Default for SecureChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CurveEngine, C: EnvelopeCipher> SecureChannel<E, C> {
    /// Channel over caller-supplied primitives.
    pub fn with_primitives(engine: E, cipher: C) -> Self {
        Self { engine, cipher }
    }

    /// Encrypt with a fresh IV from `OsRng`.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        my_private: &PrivateKey,
        their_public: &PublicKey,
        nonce: &[u8; CHANNEL_NONCE_LENGTH],
    ) -> Result<Vec<u8>, CryptoError> {
        self.encrypt_with_rng(&mut OsRng, plaintext, my_private, their_public, nonce)
    }

    /// Encrypt with an IV drawn from `rng`.
    ///
    /// Never reuse a generator state across calls under the same key; a
    /// repeated IV leaks whether two plaintexts share a prefix.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
        my_private: &PrivateKey,
        their_public: &PublicKey,
        nonce: &[u8; CHANNEL_NONCE_LENGTH],
    ) -> Result<Vec<u8>, CryptoError> {
        let key = self.channel_key(my_private, their_public, nonce);

        let mut iv = [0u8; AES_IV_LENGTH];
        rng.try_fill_bytes(&mut iv)
            .map_err(|e| CryptoError::Encoding(format!("IV generation failed: {e}")))?;

        let ciphertext = self.cipher.encrypt(&key, &iv, plaintext);

        let mut out = Vec::with_capacity(AES_IV_LENGTH + ciphertext.len());
        out.extend_from_slice(&iv);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Open an envelope.
    ///
    /// Length is checked before any key derivation or cipher work.
    pub fn decrypt(
        &self,
        envelope: &[u8],
        my_private: &PrivateKey,
        their_public: &PublicKey,
        nonce: &[u8; CHANNEL_NONCE_LENGTH],
    ) -> Result<Vec<u8>, CryptoError> {
        if envelope.len() < AES_IV_LENGTH || envelope.len() % AES_BLOCK_SIZE != 0 {
            debug!(len = envelope.len(), "rejecting envelope with invalid length");
            return Err(CryptoError::InvalidCiphertext);
        }

        let (iv_bytes, ciphertext) = envelope.split_at(AES_IV_LENGTH);
        let mut iv = [0u8; AES_IV_LENGTH];
        iv.copy_from_slice(iv_bytes);

        let key = self.channel_key(my_private, their_public, nonce);
        self.cipher.decrypt(&key, &iv, ciphertext)
    }

    /// `SHA256(dh(my_private, their_public) ^ nonce)`.
    fn channel_key(
        &self,
        my_private: &PrivateKey,
        their_public: &PublicKey,
        nonce: &[u8; CHANNEL_NONCE_LENGTH],
    ) -> Zeroizing<[u8; AES_KEY_LENGTH]> {
        let mut shared =
            Zeroizing::new(self.engine.dh(my_private.as_bytes(), their_public.as_bytes()));
        for (byte, n) in shared.iter_mut().zip(nonce.iter()) {
            *byte ^= n;
        }
        Zeroizing::new(sha256(shared.as_slice()))
    }
}
