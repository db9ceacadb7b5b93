//! # Account Addresses
//!
//! Accounts are 64-bit ids. People see them as Reed-Solomon strings with a
//! `HEAT-` prefix:
//!
//! ```text
//! public_key (32 bytes)
//!     -> SHA256 -> first 8 bytes, little-endian -> account id (u64)
//!     -> Reed-Solomon -> HEAT-XXXX-XXXX-XXXX-XXXXX
//! ```
//!
//! [`AddressCodec::decode`] is strict: the input must be exactly what
//! `encode` would print for the decoded id, case aside. Anything else,
//! including extra whitespace inside the string, is rejected. That keeps
//! one canonical spelling per account.

pub mod reed_solomon;

pub use reed_solomon::{ChecksumCodec, ReedSolomon, RsDecodeError};

use tracing::debug;

use crate::config::ACCOUNT_PREFIX;
use crate::crypto::hash::{full_hash_to_id, sha256};
use crate::crypto::keys::PublicKey;
use crate::error::CryptoError;

/// Strict address codec over a checksum codec.
#[derive(Debug, Clone, Copy)]
pub struct AddressCodec<C = ReedSolomon> {
    codec: C,
}

impl AddressCodec {
    /// Codec over [`ReedSolomon`].
    pub fn new() -> Self {
        Self { codec: ReedSolomon }
    }
}

impl Default for AddressCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ChecksumCodec> AddressCodec<C> {
    /// Codec over a caller-supplied checksum codec.
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    /// Encode an id. Never fails.
    pub fn encode(&self, id: u64) -> String {
        self.codec.encode(id)
    }

    /// Decode an unprefixed address.
    ///
    /// Input is uppercased first. A codec failure is
    /// [`CryptoError::MalformedAddress`]; a string that decodes but does not
    /// re-encode to itself is [`CryptoError::ChecksumMismatch`].
    ///
    /// # Example
    ///
    /// ```
    /// use heat_crypto::AddressCodec;
    ///
    /// let codec = AddressCodec::new();
    /// assert_eq!(codec.decode("2222-2222-2222-22222").unwrap(), 0);
    /// assert!(codec.decode("2222 2222 2222 22222").is_err());
    /// ```
    pub fn decode(&self, address: &str) -> Result<u64, CryptoError> {
        let upper = address.to_uppercase();

        let id = self.codec.decode(&upper).map_err(|e| {
            debug!(address = %upper, error = %e, "address failed checksum decode");
            CryptoError::MalformedAddress {
                address: upper.clone(),
                reason: e.to_string(),
            }
        })?;

        if self.codec.encode(id) != upper {
            debug!(address = %upper, decoded = id, "address does not re-encode to itself");
            return Err(CryptoError::ChecksumMismatch {
                address: upper,
                decoded: id,
            });
        }

        Ok(id)
    }
}

/// `HEAT-` plus the Reed-Solomon encoding of `id`.
///
/// ```
/// assert_eq!(heat_crypto::rs_account(0), "HEAT-2222-2222-2222-22222");
/// ```
pub fn rs_account(id: u64) -> String {
    format!("{ACCOUNT_PREFIX}-{}", AddressCodec::new().encode(id))
}

/// Parse user input into an account id.
///
/// Accepts a `HEAT-` address (any case) or a plain unsigned decimal id.
/// Surrounding whitespace is trimmed and empty input is id 0.
pub fn parse_account_id(input: &str) -> Result<u64, CryptoError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let upper = trimmed.to_uppercase();
    let prefix = format!("{ACCOUNT_PREFIX}-");
    match upper.strip_prefix(&prefix) {
        Some(rest) => AddressCodec::new().decode(rest),
        None => upper
            .parse::<u64>()
            .map_err(|e| CryptoError::InvalidAccountId(format!("{trimmed}: {e}"))),
    }
}

/// Account id owned by `public_key`: `SHA256(public_key)` folded to 64 bits.
pub fn account_id_from_public_key(public_key: &PublicKey) -> u64 {
    full_hash_to_id(&sha256(public_key.as_bytes()))
}
