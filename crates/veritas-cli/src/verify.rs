//! # Verify Subcommand
//!
//! Runs the verification pipeline over a credential file and prints the
//! result as JSON. Exit code 0 when verified, 2 when rejected.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use veritas_status::{RegistrySnapshot, RevocationQuery, RevocationRegistry, UnavailableQuery};
use veritas_vc::DidKeyPolicy;
use veritas_verifier::{VerificationResult, Verifier};

use crate::config::CliConfig;

/// Exit code for a credential that failed verification.
pub const EXIT_REJECTED: u8 = 2;

/// Arguments for `veritas verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the credential JSON.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Registry snapshot to check revocation against (defaults to
    /// VERITAS_REGISTRY_PATH).
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Skip the revocation check.
    #[arg(long, conflicts_with = "registry")]
    pub no_revocation: bool,

    /// Require a did:key issuer's embedded key to match the signer.
    #[arg(long)]
    pub strict_did_key: bool,
}

pub fn run_verify(args: &VerifyArgs, config: &CliConfig) -> Result<u8> {
    let result = verify_file(args, config)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(if result.verified { 0 } else { EXIT_REJECTED })
}

/// Verify the credential at `args.file`.
///
/// An unreadable credential file is `Err`; problems with the credential
/// itself are reported inside the returned result. A snapshot that cannot
/// be loaded leaves revocation unavailable, which fails open.
pub fn verify_file(args: &VerifyArgs, config: &CliConfig) -> Result<VerificationResult> {
    if !args.file.exists() {
        bail!("credential file not found: {}", args.file.display());
    }
    let json = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read credential: {}", args.file.display()))?;

    let mut verifier = Verifier::new();
    if args.strict_did_key {
        verifier = verifier.with_did_key_policy(DidKeyPolicy::RequireEmbeddedKey);
    }
    if !args.no_revocation {
        let path = args.registry.as_deref().unwrap_or(&config.registry_path);
        let query: Arc<dyn RevocationQuery> = match load_registry(path) {
            Ok(registry) => Arc::new(registry),
            Err(e) => {
                tracing::warn!(path = %path.display(), "registry snapshot unavailable: {e:#}");
                Arc::new(UnavailableQuery::new(format!("{e:#}")))
            }
        };
        verifier = verifier.with_revocation(query);
    }

    Ok(verifier.verify_json(&json))
}

/// Materialize the registry stored at `path`; a missing file is empty.
pub fn load_registry(path: &Path) -> Result<RevocationRegistry> {
    let snapshot = RegistrySnapshot::load(path)
        .with_context(|| format!("failed to load registry snapshot: {}", path.display()))?;
    tracing::debug!(path = %path.display(), lists = snapshot.lists.len(), "registry snapshot loaded");
    Ok(RevocationRegistry::from_snapshot(&snapshot))
}
