//! # Verifiable Credential Structure
//!
//! [`VerifiableCredential`] follows the W3C VC data model with the field
//! names Veritas wallets and verifiers exchange over deep links, QR codes
//! and HTTP bodies:
//!
//! `@context`, `id`, `type`, `issuer`, `issuanceDate`, `expirationDate`
//! (omitted if absent), `credentialSubject`, `credentialStatus` (omitted if
//! absent), `proof`.
//!
//! The envelope is rigid (`deny_unknown_fields`) while `credentialSubject`
//! is kept as raw JSON so that a credential round-trips through this type
//! without losing any signed member.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use veritas_core::{CanonicalBytes, Timestamp};
use veritas_crypto::{Address, SecpKeyPair};

use crate::claim::{ClaimKind, ClaimPayload, VERIFIABLE_CREDENTIAL_TYPE};
use crate::error::VcError;
use crate::proof::{self, DidKeyPolicy, Proof};
use crate::status::RevocationStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerifiableCredential {
    /// JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// `urn:uuid:` identifier, fresh per issuance.
    pub id: String,

    /// Credential types. Includes `"VerifiableCredential"`.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,

    /// DID of the issuer.
    pub issuer: String,

    pub issuance_date: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Timestamp>,

    pub credential_subject: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<RevocationStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl VerifiableCredential {
    /// Compute the canonical signing input for this credential.
    ///
    /// The JCS-canonicalized bytes of the credential with the `proof`
    /// member removed. Signing and validation both go through here.
    pub fn signing_input(&self) -> Result<CanonicalBytes, VcError> {
        let mut val = serde_json::to_value(self)?;
        if let Some(obj) = val.as_object_mut() {
            obj.remove("proof");
        }
        Ok(CanonicalBytes::from_value(val)?)
    }

    /// Sign as this credential's issuer and attach the proof.
    pub fn sign(&mut self, key: &SecpKeyPair, created: Option<Timestamp>) -> Result<(), VcError> {
        let proof = proof::sign(self, key, &self.issuer, created)?;
        self.attach_proof(proof);
        Ok(())
    }

    /// Attach a proof, replacing any existing one.
    pub fn attach_proof(&mut self, proof: Proof) {
        self.proof = Some(proof);
    }

    /// Validate the proof against the issuer DID, returning the signer.
    pub fn validate_proof(&self, policy: DidKeyPolicy) -> Result<Address, VcError> {
        proof::validate(self, policy)
    }

    /// `true` iff the proof validates under the default policy.
    pub fn is_valid(&self) -> bool {
        self.validate_proof(DidKeyPolicy::default()).is_ok()
    }

    /// Whether `type` includes `"VerifiableCredential"`.
    pub fn has_vc_type(&self) -> bool {
        self.credential_type
            .iter()
            .any(|t| t == VERIFIABLE_CREDENTIAL_TYPE)
    }

    /// The claim kind named by `type`, if any.
    pub fn claim_kind(&self) -> Option<ClaimKind> {
        ClaimKind::from_types(&self.credential_type)
    }

    /// Decode the typed claim carried in `credentialSubject`.
    pub fn claim(&self) -> Result<ClaimPayload, VcError> {
        let kind = self.claim_kind().ok_or_else(|| {
            VcError::MalformedCredential(format!(
                "no known claim type in {:?}",
                self.credential_type
            ))
        })?;
        ClaimPayload::from_subject(kind, &self.credential_subject)
    }

    /// The holder DID (`credentialSubject.id`), if present.
    pub fn subject_id(&self) -> Option<&str> {
        self.credential_subject.get("id").and_then(Value::as_str)
    }

    /// Whether the credential expired strictly before `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expiration_date.is_some_and(|exp| exp < now)
    }

    /// Compact JSON wire form.
    pub fn to_json(&self) -> Result<String, VcError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON, for files.
    pub fn to_json_pretty(&self) -> Result<String, VcError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse the JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, VcError> {
        serde_json::from_str(json).map_err(|e| VcError::MalformedCredential(e.to_string()))
    }
}
