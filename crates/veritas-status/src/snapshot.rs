//! # Registry Snapshots
//!
//! A JSON image of every non-zero status list, used to persist the
//! in-memory registry between process runs:
//!
//! ```json
//! { "version": 1, "lists": [ { "issuer": "0x…", "listIndex": 0, "word": "0x…" } ] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use veritas_crypto::Address;

use crate::word::StatusWord;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub issuer: Address,
    pub list_index: u64,
    pub word: StatusWord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub version: u32,
    pub lists: Vec<SnapshotEntry>,
}

impl RegistrySnapshot {
    pub fn new(lists: Vec<SnapshotEntry>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            lists,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from `path`; a missing file is an empty snapshot.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new(Vec::new())),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to `path` via a sibling temporary file and rename.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = self.to_json()?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}
