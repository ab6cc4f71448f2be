//! # Verifiable Presentations
//!
//! A holder wraps one or more credentials in a presentation and signs it,
//! optionally binding a verifier-issued challenge into the proof. The
//! holder proof uses the same canonicalization and signature scheme as
//! credential proofs, with `proofPurpose: "authentication"`.

use serde::{Deserialize, Serialize};
use veritas_core::CanonicalBytes;
use veritas_crypto::{Address, SecpKeyPair};
use veritas_did::{address_from_did_key, extract_identity, Identity};

use crate::claim::W3C_CREDENTIALS_V1;
use crate::credential::VerifiableCredential;
use crate::error::VcError;
use crate::proof::{recover_canonical, sign_canonical, DidKeyPolicy, Proof, ProofPurpose};

pub const VERIFIABLE_PRESENTATION_TYPE: &str = "VerifiablePresentation";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerifiablePresentation {
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    #[serde(rename = "type")]
    pub presentation_type: Vec<String>,

    pub verifiable_credential: Vec<VerifiableCredential>,

    /// DID of the holder.
    pub holder: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl VerifiablePresentation {
    /// An unsigned presentation of `credentials` by `holder`.
    pub fn new(holder: impl Into<String>, credentials: Vec<VerifiableCredential>) -> Self {
        Self {
            context: vec![W3C_CREDENTIALS_V1.to_string()],
            presentation_type: vec![VERIFIABLE_PRESENTATION_TYPE.to_string()],
            verifiable_credential: credentials,
            holder: holder.into(),
            proof: None,
        }
    }

    /// The canonical bytes of the presentation with `proof` removed.
    ///
    /// A challenge is signed by folding it into the signed body.
    fn signing_input(&self, challenge: Option<&str>) -> Result<CanonicalBytes, VcError> {
        let mut val = serde_json::to_value(self)?;
        if let Some(obj) = val.as_object_mut() {
            obj.remove("proof");
            if let Some(challenge) = challenge {
                obj.insert("challenge".into(), challenge.into());
            }
        }
        Ok(CanonicalBytes::from_value(val)?)
    }

    /// Sign as the holder, binding `challenge` when given.
    pub fn sign(&mut self, key: &SecpKeyPair, challenge: Option<&str>) -> Result<(), VcError> {
        let canonical = self.signing_input(challenge)?;
        let mut proof = sign_canonical(
            &canonical,
            key,
            &self.holder,
            ProofPurpose::Authentication,
            None,
        )?;
        proof.challenge = challenge.map(str::to_string);
        self.proof = Some(proof);
        Ok(())
    }

    /// Recover the address that signed the holder proof.
    pub fn recover_holder(&self) -> Result<Address, VcError> {
        let proof = self
            .proof
            .as_ref()
            .ok_or_else(|| VcError::InvalidSignature("presentation has no proof".into()))?;
        let canonical = self.signing_input(proof.challenge.as_deref())?;
        recover_canonical(&canonical, &proof.signature()?)
    }

    /// Validate the holder proof, requiring `expected_challenge` when given.
    pub fn validate_holder(
        &self,
        expected_challenge: Option<&str>,
        policy: DidKeyPolicy,
    ) -> Result<Address, VcError> {
        if let Some(expected) = expected_challenge {
            let presented = self.proof.as_ref().and_then(|p| p.challenge.as_deref());
            if presented != Some(expected) {
                return Err(VcError::InvalidSignature(
                    "presentation challenge does not match".into(),
                ));
            }
        }
        let signer = self.recover_holder()?;
        match extract_identity(&self.holder)? {
            Identity::Address(expected) if signer != expected => {
                Err(VcError::InvalidSignature(format!(
                    "recovered holder {signer} does not match {expected}"
                )))
            }
            Identity::RecoverFromSignature if policy == DidKeyPolicy::RequireEmbeddedKey => {
                let embedded = address_from_did_key(&self.holder)?;
                if signer == embedded {
                    Ok(signer)
                } else {
                    Err(VcError::InvalidSignature(format!(
                        "recovered holder {signer} does not match did:key address {embedded}"
                    )))
                }
            }
            _ => Ok(signer),
        }
    }

    /// Credentials whose `credentialSubject.id` is not the holder.
    pub fn foreign_credentials(&self) -> Vec<&VerifiableCredential> {
        self.verifiable_credential
            .iter()
            .filter(|vc| vc.subject_id() != Some(self.holder.as_str()))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, VcError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, VcError> {
        serde_json::from_str(json).map_err(|e| VcError::MalformedCredential(e.to_string()))
    }
}
