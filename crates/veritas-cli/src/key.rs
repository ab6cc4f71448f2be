//! # Key Subcommand
//!
//! secp256k1 key generation and the key-loading rules shared by the
//! signing subcommands.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use veritas_crypto::SecpKeyPair;
use veritas_did::DidMethod;

use crate::config::CliConfig;

/// Arguments for `veritas key`.
#[derive(Args, Debug)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Generate a new secp256k1 key pair.
    Generate {
        /// Output directory for the key files.
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
        /// Prefix for the key filenames.
        #[arg(long, default_value = "veritas")]
        prefix: String,
    },
}

pub fn run_key(args: &KeyArgs, config: &CliConfig) -> Result<u8> {
    match &args.command {
        KeyCommand::Generate { output, prefix } => cmd_generate(output, prefix, config),
    }
}

/// Write `<prefix>.key` (hex secret) and `<prefix>.pub` (hex compressed
/// public key) into `output_dir`.
fn cmd_generate(output_dir: &Path, prefix: &str, config: &CliConfig) -> Result<u8> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let key = SecpKeyPair::generate();
    let public_hex = hex_public_key(&key);

    let sk_path = output_dir.join(format!("{prefix}.key"));
    let pk_path = output_dir.join(format!("{prefix}.pub"));

    std::fs::write(&sk_path, key.secret_hex().as_bytes())
        .with_context(|| format!("failed to write private key: {}", sk_path.display()))?;
    std::fs::write(&pk_path, &public_hex)
        .with_context(|| format!("failed to write public key: {}", pk_path.display()))?;

    println!("OK: generated secp256k1 key pair");
    println!("  Private key: {}", sk_path.display());
    println!("  Public key:  {}", pk_path.display());
    println!("  Address:     {}", key.address());
    println!("  DID:         {}", DidMethod::ethr_for(&config.network, &key));

    Ok(0)
}

fn hex_public_key(key: &SecpKeyPair) -> String {
    format!("0x{}", hex::encode(key.public_key().to_compressed()))
}

/// Read a hex secret key from `path`.
pub fn read_key_file(path: &Path) -> Result<SecpKeyPair> {
    if !path.exists() {
        bail!("private key file not found: {}", path.display());
    }
    let raw = zeroize::Zeroizing::new(
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read private key: {}", path.display()))?,
    );
    SecpKeyPair::from_hex(raw.trim())
        .with_context(|| format!("invalid private key in {}", path.display()))
}

/// The signing key for a command: `--key` if given, else
/// `VERITAS_ISSUER_PRIVATE_KEY`.
pub fn signing_key(path: Option<&Path>, config: &CliConfig) -> Result<SecpKeyPair> {
    if let Some(path) = path {
        return read_key_file(path);
    }
    match &config.issuer_private_key {
        Some(secret) => SecpKeyPair::from_hex(secret)
            .context("invalid VERITAS_ISSUER_PRIVATE_KEY"),
        None => bail!("no signing key: pass --key FILE or set VERITAS_ISSUER_PRIVATE_KEY"),
    }
}
