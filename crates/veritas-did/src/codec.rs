//! # DID Encoding and Decoding
//!
//! Pure functions, no I/O. The same key material always yields the same
//! DID string.

use veritas_crypto::Address;

use crate::error::DidError;
use crate::method::{is_network_segment, DidMethod, DidPublicKey, KeyCurve};

/// Multibase prefix for base58btc.
const BASE58BTC: char = 'z';

/// What a verifier compares a recovered signer against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// The DID names an account directly.
    Address(Address),
    /// No static address exists; use the address recovered from the
    /// signature.
    RecoverFromSignature,
}

/// `did:ethr:<network>:<address>`.
///
/// `address` must be `0x` followed by 40 hex digits (any case); it is
/// rendered with its EIP-55 checksum.
pub fn encode_ethr(network: &str, address: &str) -> Result<String, DidError> {
    let address =
        Address::parse(address).map_err(|_| DidError::InvalidAddress(address.to_string()))?;
    if !is_network_segment(network) {
        return Err(DidError::malformed(
            &format!("did:ethr:{network}:{address}"),
            "empty or invalid network segment",
        ));
    }
    Ok(format!("did:ethr:{network}:{address}"))
}

/// `did:key:z<base58btc(multicodec ‖ key)>`.
pub fn encode_key(key: &DidPublicKey) -> String {
    let mut tagged = Vec::with_capacity(2 + key.as_bytes().len());
    tagged.extend_from_slice(&key.curve().multicodec());
    tagged.extend_from_slice(key.as_bytes());
    format!("did:key:{BASE58BTC}{}", bs58::encode(tagged).into_string())
}

/// Decode the public key embedded in a `did:key`.
pub fn decode_key(did: &str) -> Result<DidPublicKey, DidError> {
    let encoded = did
        .strip_prefix("did:key:")
        .ok_or_else(|| DidError::malformed(did, "not a did:key"))?;
    let payload = encoded
        .strip_prefix(BASE58BTC)
        .ok_or_else(|| DidError::malformed(did, "expected base58btc multibase prefix 'z'"))?;
    let tagged = bs58::decode(payload)
        .into_vec()
        .map_err(|e| DidError::malformed(did, format!("base58: {e}")))?;
    if tagged.len() < 2 {
        return Err(DidError::malformed(did, "payload shorter than multicodec tag"));
    }
    let tag = [tagged[0], tagged[1]];
    let curve = KeyCurve::from_multicodec(tag).ok_or_else(|| {
        DidError::malformed(did, format!("unknown multicodec tag {}", hex::encode(tag)))
    })?;
    DidPublicKey::new(curve, &tagged[2..]).map_err(|e| match e {
        DidError::MalformedDid { reason, .. } => DidError::malformed(did, reason),
        other => other,
    })
}

/// The identity a signature over content issued by `did` must recover to.
pub fn extract_identity(did: &str) -> Result<Identity, DidError> {
    match DidMethod::parse(did)? {
        DidMethod::Ethr { address, .. } => Ok(Identity::Address(address)),
        DidMethod::Key(_) => Ok(Identity::RecoverFromSignature),
    }
}

/// The Ethereum address of a secp256k1 `did:key`.
pub fn address_from_did_key(did: &str) -> Result<Address, DidError> {
    let key = decode_key(did)?;
    key.address().ok_or_else(|| {
        DidError::malformed(
            did,
            format!("{} keys have no Ethereum address", key.curve()),
        )
    })
}
