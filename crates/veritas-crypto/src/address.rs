//! # Ethereum Account Addresses
//!
//! An [`Address`] is the last 20 bytes of the Keccak-256 digest of an
//! uncompressed secp256k1 public key (without the `0x04` SEC1 tag). It is
//! the identity that `did:ethr` DIDs carry and that signature recovery
//! yields.
//!
//! Parsing is case-insensitive; rendering uses the EIP-55 mixed-case
//! checksum. Equality is byte equality, so differently-cased renderings of
//! the same account compare equal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CryptoError;
use crate::keccak::keccak256;

/// A 20-byte account identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Wrap raw address bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive the address of an uncompressed SEC1 public key (65 bytes,
    /// leading `0x04`).
    pub fn from_uncompressed_public_key(sec1: &[u8]) -> Result<Self, CryptoError> {
        if sec1.len() != 65 || sec1[0] != 0x04 {
            return Err(CryptoError::InvalidPublicKey(format!(
                "expected 65-byte uncompressed SEC1 key, got {} bytes",
                sec1.len()
            )));
        }
        let digest = keccak256(&sec1[1..]);
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest[12..]);
        Ok(Self(out))
    }

    /// Parse `0x` followed by exactly 40 hex digits (any case).
    ///
    /// Mixed-case input is not checksum-validated.
    pub fn parse(s: &str) -> Result<Self, CryptoError> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| CryptoError::InvalidAddress(format!("missing 0x prefix: {s:?}")))?;
        if body.len() != 40 {
            return Err(CryptoError::InvalidAddress(format!(
                "expected 40 hex digits, got {} in {s:?}",
                body.len()
            )));
        }
        let mut out = [0u8; 20];
        hex::decode_to_slice(body, &mut out)
            .map_err(|e| CryptoError::InvalidAddress(format!("{s:?}: {e}")))?;
        Ok(Self(out))
    }

    /// The raw 20 bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase `0x`-prefixed rendering.
    pub fn to_lower_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 checksummed rendering.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                digest[i / 2] >> 4
            } else {
                digest[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
