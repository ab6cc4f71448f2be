//! # DID Subcommand

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use veritas_did::{encode_ethr, DidRecord};

use crate::config::CliConfig;
use crate::key::signing_key;

/// Arguments for `veritas did`.
#[derive(Args, Debug)]
pub struct DidArgs {
    #[command(subcommand)]
    pub command: DidCommand,
}

#[derive(Subcommand, Debug)]
pub enum DidCommand {
    /// Encode an EVM address as a did:ethr.
    Ethr {
        /// `0x`-prefixed 20-byte address.
        #[arg(long)]
        address: String,
        /// Network segment (defaults to VERITAS_NETWORK).
        #[arg(long)]
        network: Option<String>,
    },

    /// Encode a key's public half as a did:key.
    Key {
        /// Path to the private key file.
        #[arg(long)]
        key: Option<PathBuf>,
        /// Print the DID document record as JSON instead of the bare DID.
        #[arg(long)]
        json: bool,
    },
}

pub fn run_did(args: &DidArgs, config: &CliConfig) -> Result<u8> {
    match &args.command {
        DidCommand::Ethr { address, network } => {
            let network = network.as_deref().unwrap_or(&config.network);
            let did = encode_ethr(network, address).context("failed to encode did:ethr")?;
            println!("{did}");
            Ok(0)
        }
        DidCommand::Key { key, json } => {
            let key = signing_key(key.as_deref(), config)?;
            let record = DidRecord::did_key(&key);
            if *json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", record.id);
            }
            Ok(0)
        }
    }
}
