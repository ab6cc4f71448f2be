//! # DID Records
//!
//! The `{ id, publicKey }` pair a wallet stores for its own identity.

use serde::{Deserialize, Serialize};
use veritas_crypto::SecpKeyPair;

use crate::codec::encode_key;
use crate::method::{DidMethod, DidPublicKey};

/// A DID string together with the hex public key it was minted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidRecord {
    pub id: String,
    /// Compressed SEC1 public key, `0x`-prefixed hex.
    pub public_key: String,
}

impl DidRecord {
    /// A `did:key` record for `key`.
    pub fn did_key(key: &SecpKeyPair) -> Self {
        let public = DidPublicKey::from_secp256k1(&key.public_key());
        Self {
            id: encode_key(&public),
            public_key: format!("0x{}", hex::encode(public.as_bytes())),
        }
    }

    /// A `did:ethr:<network>:<address>` record for `key`.
    pub fn did_ethr(network: &str, key: &SecpKeyPair) -> Self {
        Self {
            id: DidMethod::ethr_for(network, key).to_string(),
            public_key: format!("0x{}", hex::encode(key.public_key().to_compressed())),
        }
    }
}
