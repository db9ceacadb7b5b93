//! # Reed-Solomon Account Codec
//!
//! A (17, 13) Reed-Solomon code over GF(32). Thirteen data symbols hold the
//! base-32 digits of a 64-bit id, four parity symbols catch typos, and the
//! symbols are shuffled and grouped for display:
//!
//! ```text
//! id -> 13 base-32 digits (least significant first)
//!    -> + 4 parity symbols
//!    -> permute through CODEWORD_MAP
//!    -> XXXX-XXXX-XXXX-XXXXX
//! ```
//!
//! Decoding ignores anything outside the alphabet (dashes, spaces), so
//! `2222-2222-2222-22222` and `2222 2222 2222 22222` are the same address.
//! It only checks the syndrome; it never corrects. A single wrong character
//! is always rejected.

use thiserror::Error;

use crate::config::{RS_ALPHABET, RS_CODEWORD_LENGTH, RS_DATA_SYMBOLS, RS_PARITY_SYMBOLS};

/// Maps display position to codeword index.
const CODEWORD_MAP: [usize; RS_CODEWORD_LENGTH] = [3, 2, 1, 0, 7, 6, 5, 4, 13, 14, 15, 16, 12, 8, 9, 10, 11];

/// Coefficients of the generator polynomial `x^4 + 30x^3 + 6x^2 + 9x + 17`,
/// constant term first, leading term implied.
const GENERATOR: [u8; RS_PARITY_SYMBOLS] = [17, 9, 6, 30];

/// Dashes go after these display positions.
const GROUP_BREAKS: [usize; 3] = [3, 7, 11];

/// Errors from the raw codec. The address layer maps these onto
/// [`CryptoError`](crate::error::CryptoError).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsDecodeError {
    /// More than seventeen alphabet symbols.
    #[error("codeword has more than 17 symbols")]
    CodewordTooLong,

    /// Too few symbols, or the syndrome is non-zero.
    #[error("codeword is invalid")]
    CodewordInvalid,
}

/// Checksummed text encoding of a 64-bit id.
pub trait ChecksumCodec {
    /// Encode an id. Total: every `u64` has exactly one encoding.
    fn encode(&self, id: u64) -> String;

    /// Decode a string produced by `encode`.
    ///
    /// This is not guaranteed to reject every string that fails to
    /// round-trip. Callers that need strictness re-encode and compare.
    fn decode(&self, text: &str) -> Result<u64, RsDecodeError>;
}

/// The HEAT Reed-Solomon codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReedSolomon;

impl ChecksumCodec for ReedSolomon {
    fn encode(&self, id: u64) -> String {
        let mut codeword = [0u8; RS_CODEWORD_LENGTH];

        let mut rest = id;
        for symbol in codeword.iter_mut().take(RS_DATA_SYMBOLS) {
            *symbol = (rest & 0x1F) as u8;
            rest >>= 5;
        }

        // LFSR division by the generator, highest data symbol first.
        let mut parity = [0u8; RS_PARITY_SYMBOLS];
        for i in (0..RS_DATA_SYMBOLS).rev() {
            let feedback = codeword[i] ^ parity[3];
            parity[3] = parity[2] ^ gf32::mul(GENERATOR[3], feedback);
            parity[2] = parity[1] ^ gf32::mul(GENERATOR[2], feedback);
            parity[1] = parity[0] ^ gf32::mul(GENERATOR[1], feedback);
            parity[0] = gf32::mul(GENERATOR[0], feedback);
        }
        codeword[RS_DATA_SYMBOLS..].copy_from_slice(&parity);

        let mut out = String::with_capacity(RS_CODEWORD_LENGTH + GROUP_BREAKS.len());
        for (position, &index) in CODEWORD_MAP.iter().enumerate() {
            out.push(RS_ALPHABET[codeword[index] as usize] as char);
            if GROUP_BREAKS.contains(&position) {
                out.push('-');
            }
        }
        out
    }

    fn decode(&self, text: &str) -> Result<u64, RsDecodeError> {
        let mut codeword = [0u8; RS_CODEWORD_LENGTH];
        let mut length = 0usize;

        for byte in text.bytes() {
            let Some(symbol) = RS_ALPHABET.iter().position(|&a| a == byte) else {
                continue;
            };
            if length >= RS_CODEWORD_LENGTH {
                return Err(RsDecodeError::CodewordTooLong);
            }
            codeword[CODEWORD_MAP[length]] = symbol as u8;
            length += 1;
        }

        if length != RS_CODEWORD_LENGTH || !is_codeword_valid(&codeword) {
            return Err(RsDecodeError::CodewordInvalid);
        }

        // 13 symbols carry 65 bits. The top bit is dropped here and caught by
        // the caller's re-encode check.
        let value = codeword[..RS_DATA_SYMBOLS]
            .iter()
            .rev()
            .fold(0u128, |acc, &symbol| (acc << 5) | u128::from(symbol));
        Ok(value as u64)
    }
}

/// All four syndromes of the shortened codeword must vanish.
///
/// The code is a (31, 27) code shortened to 17 symbols; positions 13..=26 of
/// the full-length codeword are implicitly zero and skipped.
fn is_codeword_valid(codeword: &[u8; RS_CODEWORD_LENGTH]) -> bool {
    let mut sum = 0u8;
    for i in 1..=RS_PARITY_SYMBOLS {
        let mut syndrome = 0u8;
        for j in 0..gf32::ORDER {
            if (RS_DATA_SYMBOLS..=26).contains(&j) {
                continue;
            }
            let position = if j > 26 { j - 14 } else { j };
            syndrome ^= gf32::mul(codeword[position], gf32::exp((i * j) % gf32::ORDER));
        }
        sum |= syndrome;
    }
    sum == 0
}

// ---------------------------------------------------------------------------
// GF(32) Arithmetic
// ---------------------------------------------------------------------------

/// GF(32) with primitive polynomial x^5 + x^2 + 1 (0x25), generator 2.
mod gf32 {
    /// Size of the multiplicative group.
    pub const ORDER: usize = 31;

    const MODULUS: u8 = 0x25;

    const fn build_exp_table() -> [u8; 32] {
        let mut table = [0u8; 32];
        let mut val: u8 = 1;
        let mut i = 0;
        while i < ORDER {
            table[i] = val;
            val <<= 1;
            if val >= 32 {
                val ^= MODULUS;
            }
            i += 1;
        }
        table[ORDER] = table[0];
        table
    }

    const fn build_log_table() -> [u8; 32] {
        let exp = build_exp_table();
        let mut table = [0u8; 32];
        let mut i = 0;
        while i < ORDER {
            table[exp[i] as usize] = i as u8;
            i += 1;
        }
        table
    }

    static EXP: [u8; 32] = build_exp_table();
    static LOG: [u8; 32] = build_log_table();

    /// `2^power`. `power` must be below 32.
    #[inline]
    pub fn exp(power: usize) -> u8 {
        EXP[power]
    }

    #[inline]
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_sum = (LOG[a as usize] as usize + LOG[b as usize] as usize) % ORDER;
        EXP[log_sum]
    }

}
