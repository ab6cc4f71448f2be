//! # Registry Error Types

use thiserror::Error;
use veritas_crypto::Address;

use crate::abi::AbiError;

/// Errors from mutating or reading the bitmap store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Bit indices address a single 256-bit word.
    #[error("bit index {0} out of range (must be < 256)")]
    BitIndexOutOfRange(u64),

    /// Only the issuer that owns a status list may modify it.
    #[error("{caller} may not modify status lists of {issuer}")]
    Unauthorized { caller: Address, issuer: Address },

    /// Contract-shaped call data could not be decoded.
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),
}

/// Errors from the read-only revocation query capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The backing store could not be reached or answered garbage.
    #[error("revocation registry unavailable: {0}")]
    Unavailable(String),

    /// The store answered, and rejected the query.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
