//! # In-Memory Revocation Registry
//!
//! Holds every issuer's status lists in a `DashMap` keyed by
//! `(issuer, list index)`. A write takes the entry's shard lock for the
//! whole read-modify-write, so concurrent writers to different bits of the
//! same word never lose updates, and writers to unrelated keys on other
//! shards proceed in parallel. Reads copy the word out under the shard
//! read lock and never observe a partially written word.
//!
//! Writes are self-service: the caller must be the issuer whose list is
//! modified. Reads are public.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use veritas_crypto::Address;

use crate::abi::{self, RegistryCall};
use crate::error::RegistryError;
use crate::snapshot::{RegistrySnapshot, SnapshotEntry};
use crate::word::{StatusWord, WORD_BITS};

/// A bit that changed, mirroring the contract's `StatusUpdated` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdated {
    pub issuer: Address,
    pub list_index: u64,
    pub bit_index: u64,
    pub revoked: bool,
}

/// Result of executing contract-shaped calldata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallOutcome {
    /// ABI-encoded return data (empty for writes).
    pub output: Vec<u8>,
    pub events: Vec<StatusUpdated>,
}

#[derive(Debug, Default)]
pub struct RevocationRegistry {
    words: DashMap<(Address, u64), StatusWord>,
}

impl RevocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear one bit of `issuer`'s list `list_index`.
    ///
    /// Returns the event when the bit changed and `None` when it already
    /// had `value`.
    pub fn set_bit(
        &self,
        caller: &Address,
        issuer: &Address,
        list_index: u64,
        bit_index: u64,
        value: bool,
    ) -> Result<Option<StatusUpdated>, RegistryError> {
        let mut events = self.set_bits(caller, issuer, list_index, &[bit_index], value)?;
        Ok(events.pop())
    }

    /// Batch form of [`set_bit()`](Self::set_bit).
    ///
    /// Every index is validated before anything is written, so an
    /// out-of-range index leaves the list untouched. The whole batch is
    /// applied under one lock. An empty batch is a no-op.
    pub fn set_bits(
        &self,
        caller: &Address,
        issuer: &Address,
        list_index: u64,
        bit_indices: &[u64],
        value: bool,
    ) -> Result<Vec<StatusUpdated>, RegistryError> {
        if caller != issuer {
            return Err(RegistryError::Unauthorized {
                caller: *caller,
                issuer: *issuer,
            });
        }
        let bits = bit_indices
            .iter()
            .map(|&b| to_bit(b))
            .collect::<Result<Vec<_>, _>>()?;
        if bits.is_empty() {
            return Ok(Vec::new());
        }

        let mut entry = self.words.entry((*issuer, list_index)).or_default();
        let word = entry.value_mut();
        let events: Vec<StatusUpdated> = bits
            .into_iter()
            .filter(|&bit| word.set(bit, value))
            .map(|bit| StatusUpdated {
                issuer: *issuer,
                list_index,
                bit_index: u64::from(bit),
                revoked: value,
            })
            .collect();
        drop(entry);

        tracing::debug!(
            issuer = %issuer,
            list_index,
            requested = bit_indices.len(),
            changed = events.len(),
            revoked = value,
            "status list updated"
        );
        Ok(events)
    }

    /// Read one bit. Never-set bits read `false`.
    pub fn get_bit(
        &self,
        issuer: &Address,
        list_index: u64,
        bit_index: u64,
    ) -> Result<bool, RegistryError> {
        let bit = to_bit(bit_index)?;
        Ok(self.get_list(issuer, list_index).bit(bit))
    }

    /// The whole 256-bit list.
    pub fn get_list(&self, issuer: &Address, list_index: u64) -> StatusWord {
        self.words
            .get(&(*issuer, list_index))
            .map(|w| *w)
            .unwrap_or_default()
    }

    /// Execute contract calldata on behalf of `caller`.
    pub fn execute(&self, caller: &Address, calldata: &[u8]) -> Result<CallOutcome, RegistryError> {
        match RegistryCall::decode(calldata)? {
            RegistryCall::UpdateStatus {
                list_index,
                bit_index,
                revoked,
            } => Ok(CallOutcome {
                output: Vec::new(),
                events: self
                    .set_bit(caller, caller, list_index, bit_index, revoked)?
                    .into_iter()
                    .collect(),
            }),
            RegistryCall::BatchUpdateStatus {
                list_index,
                bit_indices,
                revoked,
            } => Ok(CallOutcome {
                output: Vec::new(),
                events: self.set_bits(caller, caller, list_index, &bit_indices, revoked)?,
            }),
            RegistryCall::IsRevoked {
                issuer,
                list_index,
                bit_index,
            } => Ok(CallOutcome {
                output: abi::encode_bool(self.get_bit(&issuer, list_index, bit_index)?),
                events: Vec::new(),
            }),
            RegistryCall::GetStatusList { issuer, list_index } => Ok(CallOutcome {
                output: abi::encode_word(&self.get_list(&issuer, list_index)),
                events: Vec::new(),
            }),
        }
    }

    /// Copy out every non-zero list, ordered by issuer then list index.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut lists: Vec<SnapshotEntry> = self
            .words
            .iter()
            .filter(|e| !e.value().is_zero())
            .map(|e| SnapshotEntry {
                issuer: e.key().0,
                list_index: e.key().1,
                word: *e.value(),
            })
            .collect();
        lists.sort_by_key(|e| (e.issuer, e.list_index));
        RegistrySnapshot::new(lists)
    }

    /// Rebuild a registry from a snapshot.
    pub fn from_snapshot(snapshot: &RegistrySnapshot) -> Self {
        let registry = Self::new();
        for entry in &snapshot.lists {
            registry
                .words
                .insert((entry.issuer, entry.list_index), entry.word);
        }
        registry
    }

    /// Number of `(issuer, list)` slots ever written.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn to_bit(bit_index: u64) -> Result<u8, RegistryError> {
    if bit_index >= WORD_BITS {
        return Err(RegistryError::BitIndexOutOfRange(bit_index));
    }
    u8::try_from(bit_index).map_err(|_| RegistryError::BitIndexOutOfRange(bit_index))
}
