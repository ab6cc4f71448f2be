//! # Proof Engine
//!
//! Produces and validates the detached proof attached to credentials and
//! presentations.
//!
//! ## Signing
//!
//! The signing input is the JCS canonicalization of the document with its
//! `proof` member removed. That byte string is signed as an EIP-191
//! personal message, so the `jws` member is the 65-byte `r ‖ s ‖ v`
//! signature in `0x` hex, exactly what an Ethereum wallet's
//! `personal_sign` returns for the same bytes.
//!
//! ## Validation
//!
//! The signer is *recovered* from the signature rather than checked against
//! a known key:
//!
//! - `did:ethr` issuer: the recovered address must equal the DID's address.
//! - `did:key` issuer: under [`DidKeyPolicy::AcceptRecoverable`] any
//!   recoverable signature is accepted. [`DidKeyPolicy::RequireEmbeddedKey`]
//!   additionally requires the recovered address to match the secp256k1 key
//!   embedded in the DID.
//! - Anything else fails with [`VcError::UnsupportedDidMethod`].

use serde::{Deserialize, Serialize};
use veritas_core::{CanonicalBytes, Timestamp};
use veritas_crypto::{recover_address, sign_personal_message, Address, RecoverableSignature, SecpKeyPair};
use veritas_did::{address_from_did_key, extract_identity, Identity};

use crate::credential::VerifiableCredential;
use crate::error::VcError;

/// Fragment appended to the signer DID to form `verificationMethod`.
pub const KEY_FRAGMENT: &str = "#key-1";

/// The proof suite name carried in `proof.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofType {
    /// EIP-191 secp256k1 signature carried in `jws`.
    JsonWebSignature2020,
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofType::JsonWebSignature2020 => write!(f, "JsonWebSignature2020"),
        }
    }
}

/// The purpose of a proof, per the W3C proof purpose vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The issuer asserts the credential claims (credentials).
    AssertionMethod,
    /// The holder authenticates (presentations).
    Authentication,
}

impl std::fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofPurpose::AssertionMethod => write!(f, "assertionMethod"),
            ProofPurpose::Authentication => write!(f, "authentication"),
        }
    }
}

/// How strictly a `did:key` issuer is checked against the recovered signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DidKeyPolicy {
    /// Accept any signature from which an address can be recovered.
    ///
    /// Credentials already issued under `did:key` validate this way.
    #[default]
    AcceptRecoverable,
    /// Require the recovered address to match the DID's embedded key.
    RequireEmbeddedKey,
}

/// A proof attached to a credential or presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    pub created: Timestamp,

    pub proof_purpose: ProofPurpose,

    /// Signer DID followed by `#key-1`.
    pub verification_method: String,

    /// `0x` + 130 hex digits: the 65-byte recoverable signature.
    pub jws: String,

    /// Verifier-issued nonce bound into a presentation proof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
}

impl Proof {
    /// Parse the `jws` member.
    pub fn signature(&self) -> Result<RecoverableSignature, VcError> {
        RecoverableSignature::from_hex(&self.jws)
            .map_err(|e| VcError::InvalidSignature(format!("undecodable jws: {e}")))
    }
}

/// Sign canonical bytes and build a proof around the signature.
pub(crate) fn sign_canonical(
    canonical: &CanonicalBytes,
    key: &SecpKeyPair,
    signer_did: &str,
    purpose: ProofPurpose,
    created: Option<Timestamp>,
) -> Result<Proof, VcError> {
    let signature = sign_personal_message(key, canonical)?;
    Ok(Proof {
        proof_type: ProofType::JsonWebSignature2020,
        created: created.unwrap_or_else(Timestamp::now),
        proof_purpose: purpose,
        verification_method: format!("{signer_did}{KEY_FRAGMENT}"),
        jws: signature.to_hex(),
        challenge: None,
    })
}

/// Recover the signer of canonical bytes.
pub(crate) fn recover_canonical(
    canonical: &CanonicalBytes,
    signature: &RecoverableSignature,
) -> Result<Address, VcError> {
    recover_address(canonical, signature)
        .map_err(|e| VcError::InvalidSignature(format!("signer recovery failed: {e}")))
}

/// Sign an unsigned credential as `issuer_did`.
///
/// The credential is not modified; attach the returned proof with
/// [`VerifiableCredential::attach_proof()`].
pub fn sign(
    unsigned: &VerifiableCredential,
    key: &SecpKeyPair,
    issuer_did: &str,
    created: Option<Timestamp>,
) -> Result<Proof, VcError> {
    let canonical = unsigned.signing_input()?;
    sign_canonical(
        &canonical,
        key,
        issuer_did,
        ProofPurpose::AssertionMethod,
        created,
    )
}

/// Recover the address that signed `credential`'s body.
///
/// Any proof present on `credential` is ignored; only `signature` is used.
pub fn recover_signer(
    credential: &VerifiableCredential,
    signature: &RecoverableSignature,
) -> Result<Address, VcError> {
    recover_canonical(&credential.signing_input()?, signature)
}

/// Validate the credential's proof against its issuer DID.
///
/// Returns the recovered signer address on success.
pub fn validate(
    credential: &VerifiableCredential,
    policy: DidKeyPolicy,
) -> Result<Address, VcError> {
    let proof = credential
        .proof
        .as_ref()
        .ok_or_else(|| VcError::InvalidSignature("credential has no proof".into()))?;
    let signer = recover_signer(credential, &proof.signature()?)?;

    match extract_identity(&credential.issuer)? {
        Identity::Address(expected) => {
            if signer != expected {
                tracing::warn!(
                    issuer = %credential.issuer,
                    recovered = %signer,
                    "signer does not match did:ethr issuer"
                );
                return Err(VcError::InvalidSignature(format!(
                    "recovered signer {signer} does not match issuer address {expected}"
                )));
            }
        }
        Identity::RecoverFromSignature => {
            if policy == DidKeyPolicy::RequireEmbeddedKey {
                let embedded = address_from_did_key(&credential.issuer)?;
                if signer != embedded {
                    tracing::warn!(
                        issuer = %credential.issuer,
                        recovered = %signer,
                        "signer does not match did:key embedded key"
                    );
                    return Err(VcError::InvalidSignature(format!(
                        "recovered signer {signer} does not match did:key address {embedded}"
                    )));
                }
            }
        }
    }

    tracing::debug!(issuer = %credential.issuer, signer = %signer, "credential proof valid");
    Ok(signer)
}
