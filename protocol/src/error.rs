//! Error types for the HEAT crypto layer.
//!
//! Every fallible operation returns a [`CryptoError`]. Signature verification
//! is deliberately absent: a bad signature is an answer (`false`), not an
//! error.

use thiserror::Error;

/// Errors raised by key derivation, the secure channel and the address codec.
///
/// None of these are transient. Callers fix the input or give up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Input could not be represented in the expected byte form.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The envelope has a bad length or bad padding. We don't say which key
    /// or which block; an oracle is an oracle.
    #[error("invalid ciphertext")]
    InvalidCiphertext,

    /// The Reed-Solomon codec rejected the string (alphabet, length or checksum).
    #[error("malformed address '{address}': {reason}")]
    MalformedAddress {
        /// The normalized input.
        address: String,
        /// What the codec complained about.
        reason: String,
    },

    /// The string decoded, but does not re-encode to itself.
    #[error("address '{address}' is not canonical, decoded to {decoded}")]
    ChecksumMismatch {
        /// The normalized input.
        address: String,
        /// The id the codec produced.
        decoded: u64,
    },

    /// The curve primitive signalled an internal fault.
    #[error("curve engine failure: {0}")]
    CurveEngineFailure(&'static str),

    /// A key or signature had the wrong number of bytes.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidKeyLength {
        /// Required length.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// A plain numeric account id did not parse as an unsigned 64-bit integer.
    #[error("invalid account id: {0}")]
    InvalidAccountId(String),
}
