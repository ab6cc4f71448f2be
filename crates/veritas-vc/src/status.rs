//! # Credential Status Entries
//!
//! A `StatusList2021Entry` points at one bit of an issuer's on-chain
//! revocation bitmap:
//!
//! ```json
//! {
//!   "id": "https://veritas.id/credentials/status/0#7",
//!   "type": "StatusList2021Entry",
//!   "statusPurpose": "revocation",
//!   "statusListIndex": "7",
//!   "statusListCredential": "https://veritas.id/credentials/status/0"
//! }
//! ```
//!
//! `statusListIndex` is the bit within the 256-bit word and the final path
//! segment of `statusListCredential` is the list index. Fields are kept as
//! received so that a verifier can report exactly which part is wrong.

use serde::{Deserialize, Serialize};

use crate::error::VcError;

pub const STATUS_LIST_2021_ENTRY: &str = "StatusList2021Entry";
pub const REVOCATION_PURPOSE: &str = "revocation";
/// Bits per status-list word.
pub const STATUS_LIST_BITS: u64 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationStatus {
    pub id: String,
    #[serde(rename = "type")]
    pub status_type: String,
    pub status_purpose: String,
    pub status_list_index: String,
    pub status_list_credential: String,
}

impl RevocationStatus {
    /// Point at bit `bit_index` of list `list_index` under `base_url`.
    pub fn new(base_url: &str, list_index: u64, bit_index: u64) -> Result<Self, VcError> {
        if bit_index >= STATUS_LIST_BITS {
            return Err(VcError::BitIndexOutOfRange(bit_index));
        }
        let list_uri = format!("{}/{list_index}", base_url.trim_end_matches('/'));
        Ok(Self {
            id: format!("{list_uri}#{bit_index}"),
            status_type: STATUS_LIST_2021_ENTRY.to_string(),
            status_purpose: REVOCATION_PURPOSE.to_string(),
            status_list_index: bit_index.to_string(),
            status_list_credential: list_uri,
        })
    }

    pub fn is_status_list_2021(&self) -> bool {
        self.status_type == STATUS_LIST_2021_ENTRY
    }

    /// The list index: the final `/`-delimited segment of
    /// `statusListCredential`, parsed as a non-negative integer.
    pub fn list_index(&self) -> Result<u64, VcError> {
        let uri = self.status_list_credential.as_str();
        let segment = uri.rsplit('/').next().unwrap_or_default();
        parse_decimal(segment).ok_or_else(|| VcError::MalformedStatusUri(uri.to_string()))
    }

    /// The bit index within the list word.
    pub fn bit_index(&self) -> Result<u64, VcError> {
        let bit = parse_decimal(&self.status_list_index).ok_or_else(|| {
            VcError::MalformedCredential(format!(
                "statusListIndex {:?} is not a non-negative integer",
                self.status_list_index
            ))
        })?;
        if bit >= STATUS_LIST_BITS {
            return Err(VcError::BitIndexOutOfRange(bit));
        }
        Ok(bit)
    }
}

fn parse_decimal(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
