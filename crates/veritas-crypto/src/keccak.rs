//! Keccak-256, the hash used by Ethereum for addresses, message digests and
//! ABI function selectors. Note this is the pre-standard Keccak padding, not
//! NIST SHA3-256.

use sha3::{Digest, Keccak256};

/// Compute the Keccak-256 digest of `data`.
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data.as_ref());
    hasher.finalize().into()
}
