//! # DID Error Types

use thiserror::Error;

/// Errors from DID encoding and decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DidError {
    /// The string is not a well-formed DID of a supported shape, or its
    /// `did:key` payload has a bad prefix, tag, alphabet or key length.
    #[error("malformed DID {did:?}: {reason}")]
    MalformedDid { did: String, reason: String },

    /// A `did:ethr` address is not 20 bytes of `0x`-prefixed hex.
    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    /// The DID method is neither `ethr` nor `key`.
    #[error("unsupported DID method {0:?}")]
    UnsupportedMethod(String),
}

impl DidError {
    pub(crate) fn malformed(did: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDid {
            did: did.to_string(),
            reason: reason.into(),
        }
    }
}
