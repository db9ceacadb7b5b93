//! # CLI Interface
//!
//! Defines the command-line argument structure for `heat-cli` using `clap`
//! derive. Every library operation has a subcommand; output is JSON on
//! stdout, logs go to stderr.
//!
//! Secret phrases can come from `--phrase` or `HEAT_SECRET_PHRASE`. Prefer
//! the environment variable; flags end up in shell history.

use clap::{Args, Parser, Subcommand};

/// HEAT ledger key and address tool.
#[derive(Parser, Debug)]
#[command(
    name = "heat-cli",
    about = "HEAT ledger key, signature and address tool",
    version,
    propagate_version = true
)]
pub struct HeatCli {
    /// Log filter directive, e.g. `info` or `heat_crypto=debug`.
    #[arg(long, global = true, env = "HEAT_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive the public key and account address for a phrase.
    Keys(PhraseArgs),
    /// Sign a message with a phrase.
    Sign(SignArgs),
    /// Verify a signature against a public key.
    Verify(VerifyArgs),
    /// Encrypt a message for a recipient's public key.
    Encrypt(EncryptArgs),
    /// Decrypt an envelope from a sender's public key.
    Decrypt(DecryptArgs),
    /// Print the raw ECDH shared secret with a peer.
    SharedSecret(SharedSecretArgs),
    /// Account address conversions.
    #[command(subcommand)]
    Address(AddressCommand),
    /// Print version information and exit.
    Version,
}

/// The secret phrase that identifies an account.
#[derive(Args, Debug)]
pub struct PhraseArgs {
    /// Secret phrase. Never logged.
    #[arg(long, env = "HEAT_SECRET_PHRASE", hide_env_values = true)]
    pub phrase: String,
}

/// A message given on the command line.
#[derive(Args, Debug)]
pub struct MessageArgs {
    /// Message text, or hex bytes with `--hex`.
    pub message: String,

    /// Treat the message as hex-encoded bytes.
    #[arg(long)]
    pub hex: bool,
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub phrase: PhraseArgs,

    #[command(flatten)]
    pub message: MessageArgs,
}

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Hex-encoded 64-byte signature.
    #[arg(long)]
    pub signature: String,

    /// Hex-encoded 32-byte public key of the signer.
    #[arg(long)]
    pub public_key: String,

    /// Accept non-canonical signatures and public keys.
    #[arg(long)]
    pub allow_non_canonical: bool,

    #[command(flatten)]
    pub message: MessageArgs,
}

/// Arguments for the `encrypt` subcommand.
#[derive(Args, Debug)]
pub struct EncryptArgs {
    #[command(flatten)]
    pub phrase: PhraseArgs,

    /// Hex-encoded public key of the recipient.
    #[arg(long)]
    pub recipient: String,

    /// Hex-encoded 32-byte channel nonce. Defaults to all zeros.
    #[arg(long)]
    pub nonce: Option<String>,

    #[command(flatten)]
    pub message: MessageArgs,
}

/// Arguments for the `decrypt` subcommand.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    #[command(flatten)]
    pub phrase: PhraseArgs,

    /// Hex-encoded public key of the sender.
    #[arg(long)]
    pub sender: String,

    /// Hex-encoded 32-byte channel nonce. Defaults to all zeros.
    #[arg(long)]
    pub nonce: Option<String>,

    /// Hex-encoded envelope (IV followed by ciphertext).
    pub envelope: String,
}

/// Arguments for the `shared-secret` subcommand.
#[derive(Args, Debug)]
pub struct SharedSecretArgs {
    #[command(flatten)]
    pub phrase: PhraseArgs,

    /// Hex-encoded public key of the peer.
    #[arg(long)]
    pub peer: String,
}

/// `address` subcommands.
#[derive(Subcommand, Debug)]
pub enum AddressCommand {
    /// Encode a numeric account id as `HEAT-XXXX-XXXX-XXXX-XXXXX`.
    Encode {
        /// Unsigned 64-bit account id.
        id: u64,
    },
    /// Decode an unprefixed Reed-Solomon address strictly.
    Decode {
        /// Address without the `HEAT-` prefix.
        address: String,
    },
    /// Parse a `HEAT-` address or a numeric id.
    Parse {
        /// User input, either form.
        input: String,
    },
}
