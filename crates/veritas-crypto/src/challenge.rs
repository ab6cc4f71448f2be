//! Random challenges for presentation requests.

use rand_core::{OsRng, RngCore};

/// Generate a 32-byte random challenge rendered as `0x`-prefixed hex.
pub fn generate_challenge() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}
