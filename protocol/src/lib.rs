// Copyright (c) 2026 Heat Ledger Developers. MIT License.
// See LICENSE for details.

//! # HEAT Crypto Core Library
//!
//! The identity and secure-channel layer of the HEAT ledger. Everything a
//! higher layer needs to prove who it is, talk privately to a peer, or show
//! an account number to a human lives here.
//!
//! ## Architecture
//!
//! - **crypto**: Key derivation from a secret phrase, the Curve25519
//!   signature scheme, and DH-keyed AES envelopes.
//! - **address**: Reed-Solomon checksummed account addresses
//!   (`HEAT-XXXX-XXXX-XXXX-XXXXX`).
//! - **error**: The single error taxonomy shared by every module.
//! - **config**: Protocol constants. Byte lengths, prefixes, code geometry.
//!
//! The heavy lifting (curve arithmetic, AES, Reed-Solomon) sits behind small
//! capability traits ([`crypto::CurveEngine`], [`crypto::EnvelopeCipher`],
//! [`address::ChecksumCodec`]) with default implementations, so protocol
//! logic never names a concrete backend.
//!
//! ## Design Philosophy
//!
//! 1. Verification answers yes or no. It never errors.
//! 2. Malformed input is a typed error. It is never retried.
//! 3. Private keys are never logged, serialized, or printed in `Debug`.
//! 4. Everything except IV generation is deterministic.

pub mod address;
pub mod config;
pub mod crypto;
pub mod error;

pub use address::{
    account_id_from_public_key, parse_account_id, rs_account, AddressCodec, ChecksumCodec,
    ReedSolomon,
};
pub use crypto::{KeyPair, PrivateKey, PublicKey, Signature};
pub use error::CryptoError;
