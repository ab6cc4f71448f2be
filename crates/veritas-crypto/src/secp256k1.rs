//! # secp256k1 Keys and Recoverable Signatures
//!
//! ## Security Invariant
//!
//! - [`SecpKeyPair`] does not implement `Serialize` and its `Debug` output
//!   is redacted. The only way to export the secret is
//!   [`SecpKeyPair::secret_hex()`], which returns a zeroizing buffer.
//! - Signatures are produced in low-S form. On parse, high-S signatures are
//!   normalized (and the recovery id flipped) so that signatures from other
//!   signers still recover the same key.
//!
//! ## Wire Format
//!
//! A [`RecoverableSignature`] is 65 bytes `r ‖ s ‖ v` with `v ∈ {27, 28}`,
//! rendered as `0x` + 130 hex digits, the format produced by
//! `personal_sign` in Ethereum wallets. `v ∈ {0, 1}` is accepted on input.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::address::Address;
use crate::error::CryptoError;

/// A secp256k1 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct SecpPublicKey(VerifyingKey);

impl SecpPublicKey {
    /// Parse a SEC1-encoded key (33-byte compressed or 65-byte uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    pub(crate) fn from_verifying_key(vk: VerifyingKey) -> Self {
        Self(vk)
    }

    /// 33-byte compressed SEC1 encoding.
    pub fn to_compressed(&self) -> Vec<u8> {
        self.0.to_encoded_point(true).as_bytes().to_vec()
    }

    /// 65-byte uncompressed SEC1 encoding.
    pub fn to_uncompressed(&self) -> Vec<u8> {
        self.0.to_encoded_point(false).as_bytes().to_vec()
    }

    /// The Ethereum address of this key.
    pub fn address(&self) -> Address {
        // An uncompressed encoding of a valid point is always 65 bytes with
        // a 0x04 tag, so derivation cannot fail here.
        Address::from_uncompressed_public_key(&self.to_uncompressed()).unwrap_or(Address::ZERO)
    }
}

impl std::fmt::Debug for SecpPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecpPublicKey({})", hex::encode(self.to_compressed()))
    }
}

/// A secp256k1 signing key.
pub struct SecpKeyPair {
    signing_key: SigningKey,
}

impl SecpKeyPair {
    /// Generate a fresh key from the operating system RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Build from a raw 32-byte secret scalar.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, CryptoError> {
        SigningKey::from_slice(secret)
            .map(|signing_key| Self { signing_key })
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))
    }

    /// Parse a hex secret, with or without a `0x` prefix.
    pub fn from_hex(secret_hex: &str) -> Result<Self, CryptoError> {
        let trimmed = secret_hex.trim();
        let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if body.len() != 64 {
            return Err(CryptoError::InvalidPrivateKey(format!(
                "expected 64 hex digits, got {}",
                body.len()
            )));
        }
        let bytes = Zeroizing::new(hex::decode(body)?);
        Self::from_bytes(&bytes)
    }

    /// Export the secret as `0x`-prefixed hex in a zeroizing buffer.
    pub fn secret_hex(&self) -> Zeroizing<String> {
        let bytes = Zeroizing::new(self.signing_key.to_bytes().to_vec());
        Zeroizing::new(format!("0x{}", hex::encode(bytes.as_slice())))
    }

    /// The public half of this key pair.
    pub fn public_key(&self) -> SecpPublicKey {
        SecpPublicKey(*self.signing_key.verifying_key())
    }

    /// The Ethereum address of this key pair.
    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    /// Sign a 32-byte prehash, producing a recoverable signature.
    pub fn sign_prehash(&self, prehash: &[u8; 32]) -> Result<RecoverableSignature, CryptoError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(prehash)
            .map_err(|e| CryptoError::Signing(e.to_string()))?;
        Ok(RecoverableSignature::from_parts(&signature, recovery_id))
    }
}

impl std::fmt::Debug for SecpKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecpKeyPair(<private>, {})", self.address())
    }
}

/// A 65-byte `r ‖ s ‖ v` ECDSA signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature([u8; 65]);

impl RecoverableSignature {
    fn from_parts(signature: &Signature, recovery_id: RecoveryId) -> Self {
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = 27 + recovery_id.to_byte();
        Self(out)
    }

    /// Parse 65 raw bytes; `v` may be 27/28 or 0/1.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 65 {
            return Err(CryptoError::InvalidSignature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 65];
        out.copy_from_slice(bytes);
        out[64] = match out[64] {
            0 | 1 => out[64] + 27,
            27 | 28 => out[64],
            v => {
                return Err(CryptoError::InvalidSignature(format!(
                    "recovery byte must be 0, 1, 27 or 28, got {v}"
                )))
            }
        };
        Ok(Self(out))
    }

    /// Parse hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let body = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(body)
            .map_err(|e| CryptoError::InvalidSignature(format!("hex decode: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// The raw 65 bytes.
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Split into k256 types, normalizing high-S signatures.
    pub(crate) fn to_k256(self) -> Result<(Signature, RecoveryId), CryptoError> {
        let signature = Signature::from_slice(&self.0[..64])
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        let recovery_id = RecoveryId::from_byte(self.0[64] - 27).ok_or_else(|| {
            CryptoError::InvalidSignature(format!("bad recovery byte {}", self.0[64]))
        })?;
        match signature.normalize_s() {
            Some(low) => Ok((
                low,
                RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
            )),
            None => Ok((signature, recovery_id)),
        }
    }
}

impl std::fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecoverableSignature({}...)", hex::encode(&self.0[..4]))
    }
}

impl std::fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
    const KEY_TWO: &str = "0000000000000000000000000000000000000000000000000000000000000002";

    #[test]
    fn known_addresses() {
        let one = SecpKeyPair::from_hex(KEY_ONE).unwrap();
        assert_eq!(
            one.address().to_checksum(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
        let two = SecpKeyPair::from_hex(KEY_TWO).unwrap();
        assert_eq!(
            two.address().to_checksum(),
            "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF"
        );
    }

    #[test]
    fn secret_hex_roundtrip() {
        let kp = SecpKeyPair::generate();
        let restored = SecpKeyPair::from_hex(&kp.secret_hex()).unwrap();
        assert_eq!(kp.address(), restored.address());
    }

    #[test]
    fn rejects_zero_and_short_secrets() {
        assert!(SecpKeyPair::from_hex(&"00".repeat(32)).is_err());
        assert!(SecpKeyPair::from_hex("0x1234").is_err());
        assert!(SecpKeyPair::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn public_key_encodings() {
        let kp = SecpKeyPair::generate();
        let pk = kp.public_key();
        let compressed = pk.to_compressed();
        assert_eq!(compressed.len(), 33);
        assert!(compressed[0] == 0x02 || compressed[0] == 0x03);
        assert_eq!(pk.to_uncompressed().len(), 65);
        let reparsed = SecpPublicKey::from_sec1_bytes(&compressed).unwrap();
        assert_eq!(reparsed.address(), kp.address());
    }

    #[test]
    fn debug_redacts_secret() {
        let kp = SecpKeyPair::from_hex(KEY_ONE).unwrap();
        let dbg = format!("{kp:?}");
        assert!(dbg.contains("<private>"));
        assert!(!dbg.contains(&"0".repeat(63)));
    }

    #[test]
    fn signature_v_byte_normalization() {
        let kp = SecpKeyPair::generate();
        let sig = kp.sign_prehash(&[7u8; 32]).unwrap();
        assert!(matches!(sig.as_bytes()[64], 27 | 28));

        let mut raw = *sig.as_bytes();
        raw[64] -= 27;
        let reparsed = RecoverableSignature::from_bytes(&raw).unwrap();
        assert_eq!(reparsed, sig);

        raw[64] = 5;
        assert!(RecoverableSignature::from_bytes(&raw).is_err());
    }

    #[test]
    fn signature_hex_roundtrip() {
        let kp = SecpKeyPair::generate();
        let sig = kp.sign_prehash(&[9u8; 32]).unwrap();
        let hex = sig.to_hex();
        assert_eq!(hex.len(), 132);
        assert_eq!(RecoverableSignature::from_hex(&hex).unwrap(), sig);
    }

    #[test]
    fn signature_wrong_length_rejected() {
        assert!(RecoverableSignature::from_bytes(&[0u8; 64]).is_err());
        assert!(RecoverableSignature::from_hex("0xdeadbeef").is_err());
    }
}
