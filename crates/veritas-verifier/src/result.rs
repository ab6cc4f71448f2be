//! # Verification Results

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use veritas_did::DidError;
use veritas_vc::VcError;

/// Machine-readable failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "MalformedDID")]
    MalformedDid,
    InvalidAddress,
    #[serde(rename = "UnsupportedDIDMethod")]
    UnsupportedDidMethod,
    MalformedCredential,
    Expired,
    InvalidSignature,
    UnsupportedStatusType,
    #[serde(rename = "MalformedStatusURI")]
    MalformedStatusUri,
    Revoked,
    BitIndexOutOfRange,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedDid => "MalformedDID",
            Self::InvalidAddress => "InvalidAddress",
            Self::UnsupportedDidMethod => "UnsupportedDIDMethod",
            Self::MalformedCredential => "MalformedCredential",
            Self::Expired => "Expired",
            Self::InvalidSignature => "InvalidSignature",
            Self::UnsupportedStatusType => "UnsupportedStatusType",
            Self::MalformedStatusUri => "MalformedStatusURI",
            Self::Revoked => "Revoked",
            Self::BitIndexOutOfRange => "BitIndexOutOfRange",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One itemized failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationError {
    pub kind: ErrorKind,
    pub message: String,
}

impl VerificationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl From<&DidError> for VerificationError {
    fn from(e: &DidError) -> Self {
        let kind = match e {
            DidError::MalformedDid { .. } => ErrorKind::MalformedDid,
            DidError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            DidError::UnsupportedMethod(_) => ErrorKind::UnsupportedDidMethod,
        };
        Self::new(kind, e.to_string())
    }
}

impl From<&VcError> for VerificationError {
    fn from(e: &VcError) -> Self {
        let kind = match e {
            VcError::Did(did) => return did.into(),
            VcError::InvalidSignature(_) => ErrorKind::InvalidSignature,
            VcError::UnsupportedDidMethod(_) => ErrorKind::UnsupportedDidMethod,
            VcError::UnsupportedStatusType(_) => ErrorKind::UnsupportedStatusType,
            VcError::MalformedStatusUri(_) => ErrorKind::MalformedStatusUri,
            VcError::BitIndexOutOfRange(_) => ErrorKind::BitIndexOutOfRange,
            VcError::MalformedCredential(_)
            | VcError::Canonicalization(_)
            | VcError::Signing(_)
            | VcError::Temporal(_)
            | VcError::Json(_) => ErrorKind::MalformedCredential,
        };
        Self::new(kind, e.to_string())
    }
}

/// The outcome of verifying one credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub verified: bool,
    /// Issuer DID, on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// The `credentialSubject`, on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<VerificationError>,
}

impl VerificationResult {
    pub fn success(issuer: impl Into<String>, subject: Value) -> Self {
        Self {
            verified: true,
            issuer: Some(issuer.into()),
            subject: Some(subject),
            errors: Vec::new(),
        }
    }

    pub fn failure(error: VerificationError) -> Self {
        Self {
            verified: false,
            issuer: None,
            subject: None,
            errors: vec![error],
        }
    }

    /// The kinds of all recorded errors, in order.
    pub fn error_kinds(&self) -> Vec<ErrorKind> {
        self.errors.iter().map(|e| e.kind).collect()
    }
}
