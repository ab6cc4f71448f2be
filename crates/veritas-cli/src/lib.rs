//! # veritas-cli: Command-Line Tool
//!
//! Provides the `veritas` binary for issuers and verifiers working without
//! the hosted API.
//!
//! ## Subcommands
//!
//! - `veritas key` : secp256k1 key generation.
//! - `veritas did` : `did:ethr` / `did:key` encoding.
//! - `veritas issue` : build and sign a credential.
//! - `veritas verify` : run the verification pipeline on a credential file.
//! - `veritas status` : revoke, reinstate and inspect status bits in a
//!   JSON registry snapshot.
//!
//! ```bash
//! veritas key generate --output keys --prefix acme
//! veritas issue employment --key keys/acme.key --holder did:key:z... \
//!     --employer Acme --role Engineer --start-date 2023-01-01 \
//!     --list-index 0 --bit-index 7 > vc.json
//! veritas verify vc.json
//! veritas status revoke --key keys/acme.key --list 0 --bit 7
//! ```
//!
//! Every handler returns `anyhow::Result<u8>`: the `u8` is the process exit
//! code, `Err` is reported by `main` and exits 1.

pub mod config;
pub mod did;
pub mod issue;
pub mod key;
pub mod status;
pub mod verify;

pub use config::{CliConfig, ConfigError};
