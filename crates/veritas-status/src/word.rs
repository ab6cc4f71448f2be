//! # 256-bit Status Words
//!
//! A [`StatusWord`] mirrors a Solidity `uint256`: bit `i` is
//! `(word >> i) & 1`. It renders as the big-endian hex of that integer,
//! which is what `getStatusList` returns on chain.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Bits per status list.
pub const WORD_BITS: u64 = 256;

/// One status list: 256 independent revocation flags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StatusWord([u64; 4]);

impl StatusWord {
    pub const ZERO: StatusWord = StatusWord([0; 4]);

    /// Read bit `index`.
    pub fn bit(&self, index: u8) -> bool {
        let (limb, shift) = locate(index);
        (self.0[limb] >> shift) & 1 == 1
    }

    /// Write bit `index`, returning whether the word changed.
    pub fn set(&mut self, index: u8, value: bool) -> bool {
        let before = self.bit(index);
        let (limb, shift) = locate(index);
        if value {
            self.0[limb] |= 1 << shift;
        } else {
            self.0[limb] &= !(1 << shift);
        }
        before != value
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 4]
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|l| l.count_ones()).sum()
    }

    /// Indices of set bits, ascending.
    pub fn set_bits(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |&i| self.bit(i))
    }

    /// 32 bytes, big-endian.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, limb) in self.0.iter().rev().enumerate() {
            out[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    /// Parse 32 big-endian bytes.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            limbs[3 - i] = u64::from_be_bytes(buf);
        }
        Self(limbs)
    }

    /// `0x` followed by 64 hex digits.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_be_bytes()))
    }

    /// Parse `0x` + up to 64 hex digits (shorter values are zero-extended).
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let body = s
            .strip_prefix("0x")
            .ok_or_else(|| format!("missing 0x prefix: {s:?}"))?;
        if body.is_empty() || body.len() > 64 {
            return Err(format!("expected 1 to 64 hex digits, got {}", body.len()));
        }
        let padded = format!("{body:0>64}");
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|e| format!("{s:?}: {e}"))?;
        Ok(Self::from_be_bytes(bytes))
    }
}

fn locate(index: u8) -> (usize, u32) {
    (usize::from(index / 64), u32::from(index % 64))
}

impl fmt::Debug for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusWord({})", self.to_hex())
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for StatusWord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for StatusWord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
