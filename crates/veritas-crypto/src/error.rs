//! # Cryptographic Error Types

use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature bytes are malformed or no public key can be recovered.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Private key material is not a valid secp256k1 scalar.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Public key bytes are not a valid SEC1 secp256k1 point.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// An address is not 20 bytes of `0x`-prefixed hex.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Hex decoding failed.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// The signer refused to produce a signature.
    #[error("signing failed: {0}")]
    Signing(String),
}

impl From<hex::FromHexError> for CryptoError {
    fn from(e: hex::FromHexError) -> Self {
        Self::HexDecode(e.to_string())
    }
}
