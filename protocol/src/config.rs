//! # Protocol Configuration & Constants
//!
//! Every magic number the crypto layer depends on lives here. These values
//! are part of the wire format: signatures, envelopes and addresses produced
//! by one node must be accepted by every other node. Changing any of them
//! is a hard fork.

// ---------------------------------------------------------------------------
// Key & Signature Parameters
// ---------------------------------------------------------------------------

/// Curve25519 public keys are Montgomery u-coordinates. 32 bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Private keys are clamped 32-byte scalars.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Signatures are `v || h`, two 32-byte halves.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of each signature half.
pub const SIGNATURE_HALF_LENGTH: usize = 32;

/// Diffie-Hellman output length.
pub const SHARED_SECRET_LENGTH: usize = 32;

/// SHA-256 digest length. Also the symmetric key length.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// RIPEMD-160 digest length.
pub const RIPEMD160_OUTPUT_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Secure Channel
// ---------------------------------------------------------------------------

/// Symmetric algorithm used for envelopes.
pub const SYMMETRIC_ALGORITHM: &str = "AES-256-CBC/PKCS7";

/// AES-256 key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// AES block size. Also the IV length, and the unit every ciphertext is a
/// multiple of.
pub const AES_BLOCK_SIZE: usize = 16;

/// IV prefix length of an envelope.
pub const AES_IV_LENGTH: usize = AES_BLOCK_SIZE;

/// Length of the channel-diversification nonce XORed into the DH secret.
pub const CHANNEL_NONCE_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Account Addresses
// ---------------------------------------------------------------------------

/// Prefix of the human-facing account address, without the dash.
pub const ACCOUNT_PREFIX: &str = "HEAT";

/// Number of base-32 data symbols. 13 * 5 = 65 bits covers any u64.
pub const RS_DATA_SYMBOLS: usize = 13;

/// Number of Reed-Solomon parity symbols.
pub const RS_PARITY_SYMBOLS: usize = 4;

/// Total codeword length.
pub const RS_CODEWORD_LENGTH: usize = RS_DATA_SYMBOLS + RS_PARITY_SYMBOLS;

/// The 32-symbol alphabet. No `0`, `1`, `I` or `O`, since they get misread.
pub const RS_ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";
