//! # veritas-status: Revocation Bitmap Store
//!
//! Each issuer owns an unbounded sequence of 256-bit status lists, keyed by
//! `(issuer address, list index)`. Bit `b` of list `l` is the revocation
//! flag of every credential whose `credentialStatus` points at `(l, b)`.
//! A never-touched bit reads as `false` (not revoked).
//!
//! - [`StatusWord`]: one 256-bit list.
//! - [`RevocationRegistry`]: the in-memory store, mutated only by the
//!   issuer that owns a slot, with one lock per `(issuer, list)` key.
//! - [`abi`]: the `StatusList2021Registry` calldata/return-data format so
//!   the same store can be driven through contract-shaped calls.
//! - [`RevocationQuery`]: the read-only `isRevoked` capability the
//!   verifier consumes, with [`QueryError::Unavailable`] separating
//!   transport failures from semantic ones.
//! - [`RegistrySnapshot`]: a JSON image of the store for persistence.

pub mod abi;
pub mod error;
pub mod query;
pub mod registry;
pub mod snapshot;
pub mod word;

pub use abi::{AbiError, RegistryCall};
pub use error::{QueryError, RegistryError};
pub use query::{CallTransport, ContractQuery, RevocationQuery, TransportError, UnavailableQuery};
pub use registry::{CallOutcome, RevocationRegistry, StatusUpdated};
pub use snapshot::{RegistrySnapshot, SnapshotEntry, SnapshotError};
pub use word::{StatusWord, WORD_BITS};
