//! # veritas CLI entry point
//!
//! Parses command-line arguments, loads [`CliConfig`] from the environment
//! and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use veritas_cli::did::{run_did, DidArgs};
use veritas_cli::issue::{run_issue, IssueArgs};
use veritas_cli::key::{run_key, KeyArgs};
use veritas_cli::status::{run_status, StatusArgs};
use veritas_cli::verify::{run_verify, VerifyArgs};
use veritas_cli::CliConfig;

/// Veritas credential toolkit.
///
/// Issue, verify and revoke W3C verifiable credentials signed with
/// secp256k1 keys and identified by did:ethr or did:key.
#[derive(Parser, Debug)]
#[command(name = "veritas", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// secp256k1 key generation.
    Key(KeyArgs),

    /// DID encoding.
    Did(DidArgs),

    /// Build and sign a credential.
    Issue(IssueArgs),

    /// Verify a credential file.
    Verify(VerifyArgs),

    /// Revocation bits in the registry snapshot.
    Status(StatusArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(?config, "configuration loaded");

    let result = match cli.command {
        Commands::Key(args) => run_key(&args, &config),
        Commands::Did(args) => run_did(&args, &config),
        Commands::Issue(args) => run_issue(&args, &config),
        Commands::Verify(args) => run_verify(&args, &config),
        Commands::Status(args) => run_status(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
