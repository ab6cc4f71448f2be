//! # Status Subcommand
//!
//! Revocation against a file-backed registry snapshot. The signing key's
//! address is both caller and issuer, so a key can only flip its own bits.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use veritas_crypto::Address;

use crate::config::CliConfig;
use crate::key::signing_key;
use crate::verify::load_registry;

/// Arguments for `veritas status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Registry snapshot path (defaults to VERITAS_REGISTRY_PATH).
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: StatusCommand,
}

#[derive(Subcommand, Debug)]
pub enum StatusCommand {
    /// Set a status bit (revoke a credential).
    Revoke(BitArgs),
    /// Clear a status bit.
    Reinstate(BitArgs),
    /// Print an issuer's status list.
    Show {
        /// Issuer address.
        #[arg(long)]
        issuer: String,
        #[arg(long)]
        list: u64,
    },
}

#[derive(Args, Debug, Clone)]
pub struct BitArgs {
    /// Issuer private key file.
    #[arg(long)]
    pub key: Option<PathBuf>,
    #[arg(long)]
    pub list: u64,
    #[arg(long)]
    pub bit: u64,
}

pub fn run_status(args: &StatusArgs, config: &CliConfig) -> Result<u8> {
    let path = args
        .registry
        .clone()
        .unwrap_or_else(|| config.registry_path.clone());
    match &args.command {
        StatusCommand::Revoke(bit) => cmd_set(&path, bit, true, config),
        StatusCommand::Reinstate(bit) => cmd_set(&path, bit, false, config),
        StatusCommand::Show { issuer, list } => cmd_show(&path, issuer, *list),
    }
}

fn cmd_set(path: &Path, args: &BitArgs, revoked: bool, config: &CliConfig) -> Result<u8> {
    let key = signing_key(args.key.as_deref(), config)?;
    let issuer = key.address();
    let registry = load_registry(path)?;

    let event = registry
        .set_bit(&issuer, &issuer, args.list, args.bit, revoked)
        .context("status update rejected")?;

    match event {
        Some(event) => {
            registry
                .snapshot()
                .save(path)
                .with_context(|| format!("failed to save registry snapshot: {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        None => println!(
            "OK: bit {} of list {} already {}",
            args.bit,
            args.list,
            if revoked { "set" } else { "clear" }
        ),
    }
    Ok(0)
}

fn cmd_show(path: &Path, issuer: &str, list: u64) -> Result<u8> {
    let issuer = Address::parse(issuer).context("invalid issuer address")?;
    let registry = load_registry(path)?;
    let word = registry.get_list(&issuer, list);
    let set: Vec<u8> = word.set_bits().collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "issuer": issuer,
            "listIndex": list,
            "word": word,
            "revokedBits": set,
        }))?
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_crypto::SecpKeyPair;

    fn setup() -> (tempfile::TempDir, PathBuf, SecpKeyPair) {
        let dir = tempfile::tempdir().unwrap();
        let key = SecpKeyPair::generate();
        let key_path = dir.path().join("issuer.key");
        std::fs::write(&key_path, key.secret_hex().as_bytes()).unwrap();
        (dir, key_path, key)
    }

    fn run(dir: &tempfile::TempDir, command: StatusCommand) -> Result<u8> {
        let args = StatusArgs {
            registry: Some(dir.path().join("reg.json")),
            command,
        };
        run_status(&args, &CliConfig::default())
    }

    #[test]
    fn revoke_then_reinstate_persists() {
        let (dir, key_path, key) = setup();
        let bit = BitArgs {
            key: Some(key_path),
            list: 0,
            bit: 7,
        };
        run(&dir, StatusCommand::Revoke(bit.clone())).unwrap();

        let reg = load_registry(&dir.path().join("reg.json")).unwrap();
        assert!(reg.get_bit(&key.address(), 0, 7).unwrap());

        run(&dir, StatusCommand::Reinstate(bit)).unwrap();
        let reg = load_registry(&dir.path().join("reg.json")).unwrap();
        assert!(!reg.get_bit(&key.address(), 0, 7).unwrap());
    }

    #[test]
    fn out_of_range_bit_fails_and_writes_nothing() {
        let (dir, key_path, _) = setup();
        let bit = BitArgs {
            key: Some(key_path),
            list: 0,
            bit: 256,
        };
        assert!(run(&dir, StatusCommand::Revoke(bit)).is_err());
        assert!(!dir.path().join("reg.json").exists());
    }

    #[test]
    fn show_reads_snapshot() {
        let (dir, key_path, key) = setup();
        run(
            &dir,
            StatusCommand::Revoke(BitArgs {
                key: Some(key_path),
                list: 1,
                bit: 3,
            }),
        )
        .unwrap();
        let code = run(
            &dir,
            StatusCommand::Show {
                issuer: key.address().to_lower_hex(),
                list: 1,
            },
        )
        .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn show_rejects_bad_address() {
        let (dir, _, _) = setup();
        assert!(run(
            &dir,
            StatusCommand::Show {
                issuer: "acme".into(),
                list: 0,
            },
        )
        .is_err());
    }
}
