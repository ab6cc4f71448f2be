//! # DID Methods
//!
//! [`DidMethod`] is the parsed form of a DID string. Parsing and rendering
//! are exact inverses for every DID this crate accepts: `did:ethr`
//! addresses are canonicalized to their EIP-55 checksum form on render,
//! which is also what [`encode_ethr`](crate::encode_ethr) produces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use veritas_crypto::{Address, SecpKeyPair, SecpPublicKey};

use crate::codec;
use crate::error::DidError;

/// Curves that `did:key` identifiers may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCurve {
    /// Compressed 33-byte SEC1 key, multicodec `secp256k1-pub` (0xe7).
    Secp256k1,
    /// Raw 32-byte key, multicodec `ed25519-pub` (0xed).
    Ed25519,
}

impl KeyCurve {
    /// The unsigned-varint multicodec tag.
    pub fn multicodec(self) -> [u8; 2] {
        match self {
            Self::Secp256k1 => [0xe7, 0x01],
            Self::Ed25519 => [0xed, 0x01],
        }
    }

    /// Look up a curve by its two-byte multicodec tag.
    pub fn from_multicodec(tag: [u8; 2]) -> Option<Self> {
        match tag {
            [0xe7, 0x01] => Some(Self::Secp256k1),
            [0xed, 0x01] => Some(Self::Ed25519),
            _ => None,
        }
    }

    /// Length in bytes of a key on this curve.
    pub fn key_len(self) -> usize {
        match self {
            Self::Secp256k1 => 33,
            Self::Ed25519 => 32,
        }
    }
}

impl fmt::Display for KeyCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secp256k1 => f.write_str("secp256k1"),
            Self::Ed25519 => f.write_str("ed25519"),
        }
    }
}

/// Public key material embedded in a `did:key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DidPublicKey {
    curve: KeyCurve,
    bytes: Vec<u8>,
}

impl DidPublicKey {
    /// Validate key bytes for `curve`.
    ///
    /// secp256k1 keys must be a compressed point on the curve; ed25519 keys
    /// are only length-checked.
    pub fn new(curve: KeyCurve, bytes: impl Into<Vec<u8>>) -> Result<Self, DidError> {
        let bytes = bytes.into();
        if bytes.len() != curve.key_len() {
            return Err(DidError::malformed(
                &hex::encode(&bytes),
                format!(
                    "{curve} key must be {} bytes, got {}",
                    curve.key_len(),
                    bytes.len()
                ),
            ));
        }
        if curve == KeyCurve::Secp256k1 {
            SecpPublicKey::from_sec1_bytes(&bytes)
                .map_err(|e| DidError::malformed(&hex::encode(&bytes), e.to_string()))?;
        }
        Ok(Self { curve, bytes })
    }

    /// The compressed form of a secp256k1 public key.
    pub fn from_secp256k1(key: &SecpPublicKey) -> Self {
        Self {
            curve: KeyCurve::Secp256k1,
            bytes: key.to_compressed(),
        }
    }

    /// A raw ed25519 public key.
    pub fn from_ed25519(key: [u8; 32]) -> Self {
        Self {
            curve: KeyCurve::Ed25519,
            bytes: key.to_vec(),
        }
    }

    pub fn curve(&self) -> KeyCurve {
        self.curve
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The Ethereum address of a secp256k1 key; `None` for other curves.
    pub fn address(&self) -> Option<Address> {
        match self.curve {
            KeyCurve::Secp256k1 => SecpPublicKey::from_sec1_bytes(&self.bytes)
                .ok()
                .map(|pk| pk.address()),
            KeyCurve::Ed25519 => None,
        }
    }
}

/// A parsed DID of a supported method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DidMethod {
    /// `did:ethr[:<network>]:<address>`.
    Ethr {
        network: Option<String>,
        address: Address,
    },
    /// `did:key:z...`.
    Key(DidPublicKey),
}

impl DidMethod {
    /// Parse a DID string.
    pub fn parse(did: &str) -> Result<Self, DidError> {
        let rest = did
            .strip_prefix("did:")
            .ok_or_else(|| DidError::malformed(did, "missing \"did:\" scheme"))?;
        let (method, specific) = rest
            .split_once(':')
            .ok_or_else(|| DidError::malformed(did, "missing method-specific identifier"))?;
        if specific.is_empty() {
            return Err(DidError::malformed(did, "empty method-specific identifier"));
        }
        match method {
            "ethr" => {
                let (network, address) = match specific.rsplit_once(':') {
                    Some((network, address)) => (Some(network), address),
                    None => (None, specific),
                };
                if let Some(network) = network {
                    if !is_network_segment(network) {
                        return Err(DidError::malformed(
                            did,
                            format!("invalid network segment {network:?}"),
                        ));
                    }
                }
                let address = Address::parse(address)
                    .map_err(|_| DidError::InvalidAddress(address.to_string()))?;
                Ok(Self::Ethr {
                    network: network.map(str::to_string),
                    address,
                })
            }
            "key" => codec::decode_key(did).map(Self::Key),
            "" => Err(DidError::malformed(did, "empty method name")),
            other => Err(DidError::UnsupportedMethod(other.to_string())),
        }
    }

    /// `did:ethr:<network>:<address>` for a key pair.
    pub fn ethr_for(network: &str, key: &SecpKeyPair) -> Self {
        Self::Ethr {
            network: Some(network.to_string()),
            address: key.address(),
        }
    }

    /// `did:key` for a key pair's compressed secp256k1 public key.
    pub fn key_for(key: &SecpKeyPair) -> Self {
        Self::Key(DidPublicKey::from_secp256k1(&key.public_key()))
    }

    /// The method name (`ethr` or `key`).
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::Ethr { .. } => "ethr",
            Self::Key(_) => "key",
        }
    }
}

/// Whether `s` can sit between `did:ethr:` and the address.
///
/// The address is always the final `:` segment, so the network is only
/// required to be non-empty and free of whitespace.
pub fn is_network_segment(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace)
}

impl fmt::Display for DidMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ethr {
                network: Some(network),
                address,
            } => write!(f, "did:ethr:{network}:{address}"),
            Self::Ethr {
                network: None,
                address,
            } => write!(f, "did:ethr:{address}"),
            Self::Key(key) => f.write_str(&codec::encode_key(key)),
        }
    }
}

impl FromStr for DidMethod {
    type Err = DidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DidMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DidMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

    #[test]
    fn parse_ethr_with_network() {
        let did = format!("did:ethr:polygon:{ADDR}");
        let parsed = DidMethod::parse(&did).unwrap();
        match &parsed {
            DidMethod::Ethr { network, address } => {
                assert_eq!(network.as_deref(), Some("polygon"));
                assert_eq!(address.to_checksum(), ADDR);
            }
            other => panic!("expected ethr, got {other:?}"),
        }
        assert_eq!(parsed.to_string(), did);
    }

    #[test]
    fn parse_ethr_without_network() {
        let did = format!("did:ethr:{ADDR}");
        let parsed = DidMethod::parse(&did).unwrap();
        assert!(matches!(parsed, DidMethod::Ethr { network: None, .. }));
        assert_eq!(parsed.to_string(), did);
    }

    #[test]
    fn parse_ethr_lowercase_address_renders_checksummed() {
        let did = format!("did:ethr:polygon:{}", ADDR.to_lowercase());
        let parsed = DidMethod::parse(&did).unwrap();
        assert_eq!(parsed.to_string(), format!("did:ethr:polygon:{ADDR}"));
    }

    #[test]
    fn parse_rejects_bad_ethr_address() {
        let err = DidMethod::parse("did:ethr:polygon:0x1234").unwrap_err();
        assert_eq!(err, DidError::InvalidAddress("0x1234".into()));
    }

    #[test]
    fn parse_rejects_unsupported_method() {
        let err = DidMethod::parse("did:web:example.com").unwrap_err();
        assert_eq!(err, DidError::UnsupportedMethod("web".into()));
    }

    #[test]
    fn parse_accepts_any_non_blank_network() {
        for network in ["base.sepolia", "eip155:1", "rsk/testnet", "0x89", "Polygon_Amoy"] {
            let did = format!("did:ethr:{network}:{ADDR}");
            match DidMethod::parse(&did).unwrap() {
                DidMethod::Ethr { network: parsed, .. } => {
                    assert_eq!(parsed.as_deref(), Some(network))
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(DidMethod::parse(&format!("did:ethr:main net:{ADDR}")).is_err());
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", "notadid", "did:", "did::x", "did:ethr:", "did:ethr::0xabc"] {
            assert!(DidMethod::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn key_for_roundtrips_through_string() {
        let kp = SecpKeyPair::generate();
        let method = DidMethod::key_for(&kp);
        let rendered = method.to_string();
        assert!(rendered.starts_with("did:key:z"));
        assert_eq!(DidMethod::parse(&rendered).unwrap(), method);
        match method {
            DidMethod::Key(pk) => assert_eq!(pk.address(), Some(kp.address())),
            _ => unreachable!(),
        }
    }

    #[test]
    fn did_public_key_length_checked() {
        assert!(DidPublicKey::new(KeyCurve::Ed25519, vec![0u8; 31]).is_err());
        assert!(DidPublicKey::new(KeyCurve::Ed25519, vec![0u8; 32]).is_ok());
        assert!(DidPublicKey::new(KeyCurve::Secp256k1, vec![0x02; 32]).is_err());
    }

    #[test]
    fn serde_as_string() {
        let did = format!("did:ethr:polygon:{ADDR}");
        let parsed = DidMethod::parse(&did).unwrap();
        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, format!("\"{did}\""));
        let back: DidMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parsed);
    }
}
