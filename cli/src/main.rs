// Copyright (c) 2026 Heat Ledger Developers. MIT License.
// See LICENSE for details.

//! # HEAT CLI
//!
//! Entry point for the `heat-cli` binary. Parses arguments, initializes
//! logging, runs one library operation and prints the result as JSON.
//!
//! - `keys`          derive public key and account address from a phrase
//! - `sign`          sign a message
//! - `verify`        check a signature
//! - `encrypt`       seal a message for a peer
//! - `decrypt`       open an envelope from a peer
//! - `shared-secret` print the raw ECDH secret
//! - `address`       encode, decode or parse account addresses
//! - `version`       print build version information

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use heat_crypto::config::{CHANNEL_NONCE_LENGTH, SYMMETRIC_ALGORITHM};
use heat_crypto::crypto::encryption::{SecureChannel, ZERO_NONCE};
use heat_crypto::crypto::signatures::SignatureScheme;
use heat_crypto::{parse_account_id, rs_account, AddressCodec, KeyPair, PublicKey, Signature};

use cli::{AddressCommand, Commands, HeatCli, MessageArgs};
use logging::LogFormat;

#[derive(Serialize)]
struct KeysOutput {
    public_key: String,
    account_id: String,
    account: String,
}

#[derive(Serialize)]
struct SignOutput {
    signature: String,
    public_key: String,
}

#[derive(Serialize)]
struct VerifyOutput {
    valid: bool,
}

#[derive(Serialize)]
struct EnvelopeOutput {
    envelope: String,
}

#[derive(Serialize)]
struct PlaintextOutput {
    hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
struct SharedSecretOutput {
    shared_secret: String,
}

#[derive(Serialize)]
struct AccountOutput {
    account_id: String,
    account: String,
}

fn main() -> Result<()> {
    let cli = HeatCli::parse();
    logging::init_logging(&cli.log_level, LogFormat::from_str_lossy(&cli.log_format));

    match cli.command {
        Commands::Keys(args) => {
            let pair = KeyPair::from_phrase(&args.phrase);
            let account_id = pair.account_id();
            print_json(&KeysOutput {
                public_key: pair.public_key().to_hex(),
                account_id: account_id.to_string(),
                account: rs_account(account_id),
            })
        }
        Commands::Sign(args) => {
            let pair = KeyPair::from_phrase(&args.phrase.phrase);
            let message = message_bytes(&args.message)?;
            let signature = pair.sign(&message).context("signing failed")?;
            tracing::info!(len = message.len(), "message signed");
            print_json(&SignOutput {
                signature: signature.to_hex(),
                public_key: pair.public_key().to_hex(),
            })
        }
        Commands::Verify(args) => {
            let signature = Signature::from_hex(&args.signature).context("invalid --signature")?;
            let public_key =
                PublicKey::from_hex(&args.public_key).context("invalid --public-key")?;
            let message = message_bytes(&args.message)?;

            let valid = SignatureScheme::new().verify(
                &signature,
                &message,
                &public_key,
                !args.allow_non_canonical,
            );
            print_json(&VerifyOutput { valid })?;
            if !valid {
                bail!("signature rejected");
            }
            Ok(())
        }
        Commands::Encrypt(args) => {
            let pair = KeyPair::from_phrase(&args.phrase.phrase);
            let recipient = PublicKey::from_hex(&args.recipient).context("invalid --recipient")?;
            let nonce = parse_nonce(args.nonce.as_deref())?;
            let message = message_bytes(&args.message)?;

            let envelope = SecureChannel::new()
                .encrypt(&message, pair.private_key(), &recipient, &nonce)
                .context("encryption failed")?;
            print_json(&EnvelopeOutput {
                envelope: hex::encode(envelope),
            })
        }
        Commands::Decrypt(args) => {
            let pair = KeyPair::from_phrase(&args.phrase.phrase);
            let sender = PublicKey::from_hex(&args.sender).context("invalid --sender")?;
            let nonce = parse_nonce(args.nonce.as_deref())?;
            let envelope = hex::decode(args.envelope.trim()).context("envelope is not hex")?;

            let plaintext = SecureChannel::new()
                .decrypt(&envelope, pair.private_key(), &sender, &nonce)
                .context("decryption failed")?;
            print_json(&PlaintextOutput {
                hex: hex::encode(&plaintext),
                text: String::from_utf8(plaintext).ok(),
            })
        }
        Commands::SharedSecret(args) => {
            let pair = KeyPair::from_phrase(&args.phrase.phrase);
            let peer = PublicKey::from_hex(&args.peer).context("invalid --peer")?;
            print_json(&SharedSecretOutput {
                shared_secret: hex::encode(pair.shared_secret(&peer)),
            })
        }
        Commands::Address(command) => run_address(command),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn run_address(command: AddressCommand) -> Result<()> {
    let account_id = match command {
        AddressCommand::Encode { id } => id,
        AddressCommand::Decode { address } => AddressCodec::new()
            .decode(&address)
            .with_context(|| format!("cannot decode address {address}"))?,
        AddressCommand::Parse { input } => {
            parse_account_id(&input).with_context(|| format!("cannot parse account {input}"))?
        }
    };

    print_json(&AccountOutput {
        account_id: account_id.to_string(),
        account: rs_account(account_id),
    })
}

/// Message bytes from the command line, hex-decoded with `--hex`.
fn message_bytes(args: &MessageArgs) -> Result<Vec<u8>> {
    if args.hex {
        hex::decode(args.message.trim()).context("message is not valid hex")
    } else {
        Ok(args.message.as_bytes().to_vec())
    }
}

/// Channel nonce from an optional hex string. Absent means all zeros.
fn parse_nonce(input: Option<&str>) -> Result<[u8; CHANNEL_NONCE_LENGTH]> {
    let Some(text) = input else {
        return Ok(ZERO_NONCE);
    };
    let bytes = hex::decode(text.trim()).context("nonce is not valid hex")?;
    let nonce: [u8; CHANNEL_NONCE_LENGTH] = bytes.as_slice().try_into().with_context(|| {
        format!("nonce must be {CHANNEL_NONCE_LENGTH} bytes, got {}", bytes.len())
    })?;
    Ok(nonce)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("heat-cli  {}", env!("CARGO_PKG_VERSION"));
    println!("cipher    {}", SYMMETRIC_ALGORITHM);
    println!("rustc     {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
