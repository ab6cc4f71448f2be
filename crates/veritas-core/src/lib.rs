//! # veritas-core: Foundational Types
//!
//! The leaf crate of the Veritas workspace. Every other crate depends on it;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Every signature over a credential or
//!    presentation is computed from `CanonicalBytes`. The signer and the
//!    verifier share the one constructor, so both always derive the same
//!    byte sequence from the same document regardless of field order in
//!    memory or on the wire.
//!
//! 2. **UTC-only timestamps.** [`Timestamp`] is UTC with a `Z` suffix and
//!    seconds precision, so `issuanceDate`, `expirationDate` and
//!    `proof.created` always render identically.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `veritas-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use error::{CanonicalizationError, TemporalError};
pub use temporal::Timestamp;
