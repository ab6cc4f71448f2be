//! # Credential Error Types

use thiserror::Error;
use veritas_core::{CanonicalizationError, TemporalError};
use veritas_crypto::CryptoError;
use veritas_did::DidError;

/// Errors from building, signing and validating credentials.
#[derive(Error, Debug)]
pub enum VcError {
    /// A required field is missing or has the wrong shape.
    #[error("malformed credential: {0}")]
    MalformedCredential(String),

    /// The proof is missing, undecodable, or recovers to the wrong signer.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The issuer DID uses a method the proof engine cannot validate.
    #[error("unsupported DID method: {0}")]
    UnsupportedDidMethod(String),

    /// The issuer or holder DID could not be decoded.
    #[error("DID error: {0}")]
    Did(DidError),

    /// `credentialStatus.type` is not `StatusList2021Entry`.
    #[error("unsupported credential status type: {0:?}")]
    UnsupportedStatusType(String),

    /// The status-list URI does not end in an integer list index.
    #[error("malformed status list URI: {0:?}")]
    MalformedStatusUri(String),

    /// A status-list bit index is outside the 256-bit word.
    #[error("status bit index {0} out of range (must be < 256)")]
    BitIndexOutOfRange(u64),

    /// Canonicalization of the credential body failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Signing with the issuer key failed.
    #[error("signing failed: {0}")]
    Signing(#[from] CryptoError),

    /// Date arithmetic overflowed.
    #[error("timestamp error: {0}")]
    Temporal(#[from] TemporalError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<DidError> for VcError {
    fn from(e: DidError) -> Self {
        match e {
            DidError::UnsupportedMethod(method) => Self::UnsupportedDidMethod(method),
            other => Self::Did(other),
        }
    }
}
