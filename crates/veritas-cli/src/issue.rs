//! # Issue Subcommand
//!
//! Builds and signs a credential with the issuer's secp256k1 key. The
//! issuer DID is the key's `did:ethr` on the configured network.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use veritas_did::DidMethod;
use veritas_vc::{
    ClaimPayload, CredentialBuilder, EmploymentClaim, RevocationStatus, VerifiableCredential,
};

use crate::config::CliConfig;
use crate::key::signing_key;

/// Arguments for `veritas issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Path to the issuer's private key file.
    #[arg(long, global = true)]
    pub key: Option<PathBuf>,

    /// Write the credential here instead of stdout.
    #[arg(long, short, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: IssueCommand,
}

#[derive(Subcommand, Debug)]
pub enum IssueCommand {
    /// Issue a ProofOfEmploymentCredential.
    Employment(EmploymentArgs),
}

#[derive(Args, Debug, Clone)]
pub struct EmploymentArgs {
    /// Holder DID.
    #[arg(long)]
    pub holder: String,
    #[arg(long)]
    pub employer: String,
    #[arg(long)]
    pub role: String,
    #[arg(long)]
    pub start_date: String,
    #[arg(long)]
    pub end_date: Option<String>,
    /// Validity in days; 0 issues a credential that never expires.
    #[arg(long)]
    pub expires_in_days: Option<u32>,
    /// Status list index, making the credential revocable.
    #[arg(long, requires = "bit_index")]
    pub list_index: Option<u64>,
    /// Bit within the status list (0-255).
    #[arg(long, requires = "list_index")]
    pub bit_index: Option<u64>,
}

pub fn run_issue(args: &IssueArgs, config: &CliConfig) -> Result<u8> {
    let key = signing_key(args.key.as_deref(), config)?;
    let credential = match &args.command {
        IssueCommand::Employment(employment) => issue_employment(employment, &key, config)?,
    };
    let json = credential.to_json_pretty()?;
    match &args.output {
        Some(path) => write_credential(path, &json)?,
        None => println!("{json}"),
    }
    Ok(0)
}

/// Build and sign an employment credential.
pub fn issue_employment(
    args: &EmploymentArgs,
    key: &veritas_crypto::SecpKeyPair,
    config: &CliConfig,
) -> Result<VerifiableCredential> {
    let issuer = DidMethod::ethr_for(&config.network, key).to_string();
    let claim = ClaimPayload::Employment(EmploymentClaim {
        id: String::new(),
        employer: args.employer.clone(),
        role: args.role.clone(),
        start_date: args.start_date.clone(),
        end_date: args.end_date.clone(),
    });

    let mut builder = CredentialBuilder::new(claim, issuer, args.holder.as_str())
        .expires_in_days(Some(args.expires_in_days.unwrap_or(config.expires_in_days)));
    if let (Some(list), Some(bit)) = (args.list_index, args.bit_index) {
        let status = RevocationStatus::new(&config.status_base_url, list, bit)
            .context("invalid revocation status")?;
        builder = builder.status(status);
    }
    builder.issue(key).context("failed to issue credential")
}

fn write_credential(path: &Path, json: &str) -> Result<()> {
    std::fs::write(path, json)
        .with_context(|| format!("failed to write credential: {}", path.display()))?;
    eprintln!("OK: wrote {}", path.display());
    Ok(())
}
