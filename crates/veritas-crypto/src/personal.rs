//! # EIP-191 Personal Messages
//!
//! `personal_sign` hashes `"\x19Ethereum Signed Message:\n" ‖ decimal(len) ‖ message`
//! with Keccak-256 and signs the digest. Verification never needs the
//! signer's public key: the key is recovered from the signature and
//! compared by address.

use k256::ecdsa::VerifyingKey;

use crate::address::Address;
use crate::error::CryptoError;
use crate::keccak::keccak256;
use crate::secp256k1::{RecoverableSignature, SecpKeyPair, SecpPublicKey};

const PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// The EIP-191 digest of `message`.
pub fn personal_message_hash(message: impl AsRef<[u8]>) -> [u8; 32] {
    let message = message.as_ref();
    let len = message.len().to_string();
    let mut buf = Vec::with_capacity(PREFIX.len() + len.len() + message.len());
    buf.extend_from_slice(PREFIX);
    buf.extend_from_slice(len.as_bytes());
    buf.extend_from_slice(message);
    keccak256(buf)
}

/// Sign `message` the way `personal_sign` does.
pub fn sign_personal_message(
    key: &SecpKeyPair,
    message: impl AsRef<[u8]>,
) -> Result<RecoverableSignature, CryptoError> {
    key.sign_prehash(&personal_message_hash(message))
}

/// Recover the public key that produced `signature` over `message`.
pub fn recover_public_key(
    message: impl AsRef<[u8]>,
    signature: &RecoverableSignature,
) -> Result<SecpPublicKey, CryptoError> {
    let digest = personal_message_hash(message);
    let (sig, recovery_id) = signature.to_k256()?;
    VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id)
        .map(SecpPublicKey::from_verifying_key)
        .map_err(|e| CryptoError::InvalidSignature(format!("recovery failed: {e}")))
}

/// Recover the address that produced `signature` over `message`.
pub fn recover_address(
    message: impl AsRef<[u8]>,
    signature: &RecoverableSignature,
) -> Result<Address, CryptoError> {
    recover_public_key(message, signature).map(|pk| pk.address())
}

/// True iff `signature` over `message` recovers to `expected`.
///
/// Malformed or unrecoverable signatures yield `false`.
pub fn verify_personal_message(
    message: impl AsRef<[u8]>,
    signature: &RecoverableSignature,
    expected: &Address,
) -> bool {
    match recover_address(message, signature) {
        Ok(recovered) => recovered == *expected,
        Err(e) => {
            tracing::debug!(error = %e, "personal message recovery failed");
            false
        }
    }
}
