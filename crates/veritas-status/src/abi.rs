//! # StatusList2021Registry ABI
//!
//! Calldata and return-data encoding for the registry contract interface:
//!
//! ```text
//! updateStatus(uint256 listIndex, uint256 bitIndex, bool revoked)
//! batchUpdateStatus(uint256 listIndex, uint256[] bitIndices, bool revoked)
//! isRevoked(address issuer, uint256 listIndex, uint256 bitIndex) returns (bool)
//! getStatusList(address issuer, uint256 listIndex) returns (uint256)
//! event StatusUpdated(address indexed issuer, uint256 indexed listIndex, uint256 bitIndex, bool revoked)
//! ```
//!
//! Calldata is the 4-byte selector (first bytes of the Keccak-256 of the
//! signature) followed by 32-byte words. Indices are limited to `u64`;
//! larger `uint256` arguments are rejected rather than truncated.

use thiserror::Error;
use veritas_crypto::{keccak256, Address};

use crate::word::StatusWord;

pub const UPDATE_STATUS: &str = "updateStatus(uint256,uint256,bool)";
pub const BATCH_UPDATE_STATUS: &str = "batchUpdateStatus(uint256,uint256[],bool)";
pub const IS_REVOKED: &str = "isRevoked(address,uint256,uint256)";
pub const GET_STATUS_LIST: &str = "getStatusList(address,uint256)";
pub const STATUS_UPDATED_EVENT: &str = "StatusUpdated(address,uint256,uint256,bool)";

const WORD: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("calldata shorter than a selector")]
    MissingSelector,

    #[error("unknown selector 0x{0}")]
    UnknownSelector(String),

    #[error("expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("uint256 value does not fit in 64 bits")]
    ValueOverflow,

    #[error("invalid bool word")]
    InvalidBool,

    #[error("invalid address word")]
    InvalidAddress,
}

/// The first four bytes of the Keccak-256 of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Topic 0 of the `StatusUpdated` event log.
pub fn status_updated_topic() -> [u8; 32] {
    keccak256(STATUS_UPDATED_EVENT.as_bytes())
}

/// A decoded registry call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    UpdateStatus {
        list_index: u64,
        bit_index: u64,
        revoked: bool,
    },
    BatchUpdateStatus {
        list_index: u64,
        bit_indices: Vec<u64>,
        revoked: bool,
    },
    IsRevoked {
        issuer: Address,
        list_index: u64,
        bit_index: u64,
    },
    GetStatusList {
        issuer: Address,
        list_index: u64,
    },
}

impl RegistryCall {
    /// Whether the call mutates state.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::UpdateStatus { .. } | Self::BatchUpdateStatus { .. }
        )
    }

    /// Encode as calldata.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::UpdateStatus {
                list_index,
                bit_index,
                revoked,
            } => {
                let mut out = selector(UPDATE_STATUS).to_vec();
                out.extend_from_slice(&uint_word(*list_index));
                out.extend_from_slice(&uint_word(*bit_index));
                out.extend_from_slice(&bool_word(*revoked));
                out
            }
            Self::BatchUpdateStatus {
                list_index,
                bit_indices,
                revoked,
            } => {
                let mut out = selector(BATCH_UPDATE_STATUS).to_vec();
                out.extend_from_slice(&uint_word(*list_index));
                // Offset of the dynamic array from the start of the arguments.
                out.extend_from_slice(&uint_word(3 * WORD as u64));
                out.extend_from_slice(&bool_word(*revoked));
                out.extend_from_slice(&uint_word(bit_indices.len() as u64));
                for bit in bit_indices {
                    out.extend_from_slice(&uint_word(*bit));
                }
                out
            }
            Self::IsRevoked {
                issuer,
                list_index,
                bit_index,
            } => {
                let mut out = selector(IS_REVOKED).to_vec();
                out.extend_from_slice(&address_word(issuer));
                out.extend_from_slice(&uint_word(*list_index));
                out.extend_from_slice(&uint_word(*bit_index));
                out
            }
            Self::GetStatusList { issuer, list_index } => {
                let mut out = selector(GET_STATUS_LIST).to_vec();
                out.extend_from_slice(&address_word(issuer));
                out.extend_from_slice(&uint_word(*list_index));
                out
            }
        }
    }

    /// Decode calldata.
    pub fn decode(calldata: &[u8]) -> Result<Self, AbiError> {
        if calldata.len() < 4 {
            return Err(AbiError::MissingSelector);
        }
        let (sel, args) = calldata.split_at(4);
        if sel == selector(UPDATE_STATUS) {
            Ok(Self::UpdateStatus {
                list_index: read_uint(args, 0)?,
                bit_index: read_uint(args, 1)?,
                revoked: read_bool(args, 2)?,
            })
        } else if sel == selector(BATCH_UPDATE_STATUS) {
            let list_index = read_uint(args, 0)?;
            let offset = usize::try_from(read_uint(args, 1)?).map_err(|_| AbiError::ValueOverflow)?;
            let revoked = read_bool(args, 2)?;
            if offset % WORD != 0 {
                return Err(AbiError::Truncated {
                    expected: offset.next_multiple_of(WORD),
                    actual: args.len(),
                });
            }
            let len_slot = offset / WORD;
            let len = usize::try_from(read_uint(args, len_slot)?).map_err(|_| AbiError::ValueOverflow)?;
            let needed = (len_slot + 1)
                .checked_add(len)
                .and_then(|words| words.checked_mul(WORD))
                .ok_or(AbiError::ValueOverflow)?;
            if args.len() < needed {
                return Err(AbiError::Truncated {
                    expected: needed,
                    actual: args.len(),
                });
            }
            let bit_indices = (0..len)
                .map(|i| read_uint(args, len_slot + 1 + i))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Self::BatchUpdateStatus {
                list_index,
                bit_indices,
                revoked,
            })
        } else if sel == selector(IS_REVOKED) {
            Ok(Self::IsRevoked {
                issuer: read_address(args, 0)?,
                list_index: read_uint(args, 1)?,
                bit_index: read_uint(args, 2)?,
            })
        } else if sel == selector(GET_STATUS_LIST) {
            Ok(Self::GetStatusList {
                issuer: read_address(args, 0)?,
                list_index: read_uint(args, 1)?,
            })
        } else {
            Err(AbiError::UnknownSelector(hex::encode(sel)))
        }
    }
}

/// ABI-encode a `bool` return value.
pub fn encode_bool(value: bool) -> Vec<u8> {
    bool_word(value).to_vec()
}

/// ABI-encode a `uint256` status word return value.
pub fn encode_word(word: &StatusWord) -> Vec<u8> {
    word.to_be_bytes().to_vec()
}

/// Decode a `bool` return value.
pub fn decode_bool(data: &[u8]) -> Result<bool, AbiError> {
    read_bool(data, 0)
}

/// Decode a `uint256` return value as a status word.
pub fn decode_word(data: &[u8]) -> Result<StatusWord, AbiError> {
    Ok(StatusWord::from_be_bytes(slot(data, 0)?))
}

fn uint_word(value: u64) -> [u8; WORD] {
    let mut out = [0u8; WORD];
    out[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    out
}

fn bool_word(value: bool) -> [u8; WORD] {
    uint_word(u64::from(value))
}

fn address_word(address: &Address) -> [u8; WORD] {
    let mut out = [0u8; WORD];
    out[12..].copy_from_slice(address.as_bytes());
    out
}

fn slot(data: &[u8], index: usize) -> Result<[u8; WORD], AbiError> {
    let start = index * WORD;
    let end = start + WORD;
    let bytes = data.get(start..end).ok_or(AbiError::Truncated {
        expected: end,
        actual: data.len(),
    })?;
    let mut out = [0u8; WORD];
    out.copy_from_slice(bytes);
    Ok(out)
}

fn read_uint(data: &[u8], index: usize) -> Result<u64, AbiError> {
    let word = slot(data, index)?;
    if word[..WORD - 8].iter().any(|&b| b != 0) {
        return Err(AbiError::ValueOverflow);
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(buf))
}

fn read_bool(data: &[u8], index: usize) -> Result<bool, AbiError> {
    match read_uint(data, index) {
        Ok(0) => Ok(false),
        Ok(1) => Ok(true),
        Ok(_) | Err(AbiError::ValueOverflow) => Err(AbiError::InvalidBool),
        Err(e) => Err(e),
    }
}

fn read_address(data: &[u8], index: usize) -> Result<Address, AbiError> {
    let word = slot(data, index)?;
    if word[..12].iter().any(|&b| b != 0) {
        return Err(AbiError::InvalidAddress);
    }
    let mut out = [0u8; 20];
    out.copy_from_slice(&word[12..]);
    Ok(Address::from_bytes(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> Address {
        Address::parse("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf").unwrap()
    }

    #[test]
    fn selectors_are_keccak_prefixes() {
        // Known ERC-20 selector, same derivation.
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
        let all = [
            selector(UPDATE_STATUS),
            selector(BATCH_UPDATE_STATUS),
            selector(IS_REVOKED),
            selector(GET_STATUS_LIST),
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn update_status_layout() {
        let data = RegistryCall::UpdateStatus {
            list_index: 1,
            bit_index: 42,
            revoked: true,
        }
        .encode();
        assert_eq!(data.len(), 4 + 3 * 32);
        assert_eq!(data[4 + 31], 1);
        assert_eq!(data[4 + 63], 42);
        assert_eq!(data[4 + 95], 1);
    }

    #[test]
    fn batch_layout_has_dynamic_tail() {
        let call = RegistryCall::BatchUpdateStatus {
            list_index: 0,
            bit_indices: vec![5, 15, 25],
            revoked: true,
        };
        let data = call.encode();
        assert_eq!(data.len(), 4 + (3 + 1 + 3) * 32);
        // Offset word points past the three head words.
        assert_eq!(data[4 + 63], 0x60);
        assert_eq!(data[4 + 3 * 32 + 31], 3);
        assert_eq!(RegistryCall::decode(&data).unwrap(), call);
    }

    #[test]
    fn empty_batch_decodes() {
        let call = RegistryCall::BatchUpdateStatus {
            list_index: 9,
            bit_indices: vec![],
            revoked: false,
        };
        assert_eq!(RegistryCall::decode(&call.encode()).unwrap(), call);
    }

    #[test]
    fn view_calls_decode() {
        let is_revoked = RegistryCall::IsRevoked {
            issuer: issuer(),
            list_index: 999_999,
            bit_index: 128,
        };
        assert_eq!(RegistryCall::decode(&is_revoked.encode()).unwrap(), is_revoked);
        assert!(!is_revoked.is_write());

        let get = RegistryCall::GetStatusList {
            issuer: issuer(),
            list_index: 3,
        };
        assert_eq!(RegistryCall::decode(&get.encode()).unwrap(), get);
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert_eq!(RegistryCall::decode(&[1, 2]), Err(AbiError::MissingSelector));
        assert!(matches!(
            RegistryCall::decode(&[0, 0, 0, 0]),
            Err(AbiError::UnknownSelector(_))
        ));

        let mut data = RegistryCall::UpdateStatus {
            list_index: 0,
            bit_index: 1,
            revoked: true,
        }
        .encode();
        data.truncate(data.len() - 1);
        assert!(matches!(
            RegistryCall::decode(&data),
            Err(AbiError::Truncated { .. })
        ));

        let mut data = RegistryCall::UpdateStatus {
            list_index: 0,
            bit_index: 1,
            revoked: true,
        }
        .encode();
        data[4 + 32] = 0xff;
        assert_eq!(RegistryCall::decode(&data), Err(AbiError::ValueOverflow));

        let mut data = RegistryCall::UpdateStatus {
            list_index: 0,
            bit_index: 1,
            revoked: true,
        }
        .encode();
        data[4 + 95] = 2;
        assert_eq!(RegistryCall::decode(&data), Err(AbiError::InvalidBool));
    }

    #[test]
    fn batch_with_short_tail_rejected() {
        let mut data = RegistryCall::BatchUpdateStatus {
            list_index: 0,
            bit_indices: vec![1, 2],
            revoked: true,
        }
        .encode();
        data.truncate(data.len() - 32);
        assert!(matches!(
            RegistryCall::decode(&data),
            Err(AbiError::Truncated { .. })
        ));
    }

    #[test]
    fn return_values() {
        assert!(decode_bool(&encode_bool(true)).unwrap());
        assert!(!decode_bool(&encode_bool(false)).unwrap());
        assert!(decode_bool(&[0u8; 31]).is_err());

        let mut w = StatusWord::ZERO;
        w.set(0, true);
        w.set(255, true);
        let decoded = decode_word(&encode_word(&w)).unwrap();
        assert!(decoded.bit(0) && decoded.bit(255));
    }

    #[test]
    fn event_topic_is_keccak_of_signature() {
        assert_eq!(status_updated_topic(), keccak256(STATUS_UPDATED_EVENT));
    }
}
