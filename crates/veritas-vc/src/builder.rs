//! # Credential Builder
//!
//! Assembles an unsigned credential from a typed claim. The builder picks
//! the `type`/`@context` pair for the claim kind, mints a fresh
//! `urn:uuid:` identifier, stamps `issuanceDate`, and computes
//! `expirationDate` when a validity period is given.

use uuid::Uuid;
use veritas_core::Timestamp;
use veritas_crypto::SecpKeyPair;

use crate::claim::{ClaimPayload, VERIFIABLE_CREDENTIAL_TYPE, W3C_CREDENTIALS_V1};
use crate::credential::VerifiableCredential;
use crate::error::VcError;
use crate::status::RevocationStatus;

/// Builder for unsigned credentials.
#[derive(Debug, Clone)]
pub struct CredentialBuilder {
    claim: ClaimPayload,
    issuer: String,
    holder: String,
    expires_in_days: Option<u32>,
    status: Option<RevocationStatus>,
    issued_at: Option<Timestamp>,
}

impl CredentialBuilder {
    pub fn new(claim: ClaimPayload, issuer: impl Into<String>, holder: impl Into<String>) -> Self {
        Self {
            claim,
            issuer: issuer.into(),
            holder: holder.into(),
            expires_in_days: None,
            status: None,
            issued_at: None,
        }
    }

    /// Expire `days` after issuance. Zero means no expiration.
    pub fn expires_in_days(mut self, days: Option<u32>) -> Self {
        self.expires_in_days = days;
        self
    }

    /// Attach a revocation status entry.
    pub fn status(mut self, status: RevocationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Override the issuance time (defaults to now).
    pub fn issued_at(mut self, at: Timestamp) -> Self {
        self.issued_at = Some(at);
        self
    }

    /// Produce the unsigned credential.
    pub fn build(self) -> Result<VerifiableCredential, VcError> {
        let issuance_date = self.issued_at.unwrap_or_else(Timestamp::now);
        let expiration_date = match self.expires_in_days {
            Some(days) if days > 0 => Some(issuance_date.plus_days(days)?),
            _ => None,
        };

        let mut claim = self.claim;
        claim.set_subject_id(self.holder);
        let kind = claim.kind();

        Ok(VerifiableCredential {
            context: vec![W3C_CREDENTIALS_V1.to_string(), kind.context().to_string()],
            id: new_credential_id(),
            credential_type: vec![
                VERIFIABLE_CREDENTIAL_TYPE.to_string(),
                kind.credential_type().to_string(),
            ],
            issuer: self.issuer,
            issuance_date,
            expiration_date,
            credential_subject: claim.to_subject()?,
            credential_status: self.status,
            proof: None,
        })
    }

    /// Build and sign with `key` in one step.
    pub fn issue(self, key: &SecpKeyPair) -> Result<VerifiableCredential, VcError> {
        let mut vc = self.build()?;
        vc.sign(key, None)?;
        tracing::info!(
            id = %vc.id,
            issuer = %vc.issuer,
            credential_type = ?vc.credential_type,
            revocable = vc.credential_status.is_some(),
            "credential issued"
        );
        Ok(vc)
    }
}

/// Build an unsigned credential.
pub fn build(
    claim: ClaimPayload,
    issuer: &str,
    holder: &str,
    expires_in_days: Option<u32>,
) -> Result<VerifiableCredential, VcError> {
    CredentialBuilder::new(claim, issuer, holder)
        .expires_in_days(expires_in_days)
        .build()
}

/// Build and sign a credential for `holder`.
pub fn issue_credential(
    claim: ClaimPayload,
    holder: &str,
    key: &SecpKeyPair,
    issuer: &str,
    expires_in_days: Option<u32>,
) -> Result<VerifiableCredential, VcError> {
    CredentialBuilder::new(claim, issuer, holder)
        .expires_in_days(expires_in_days)
        .issue(key)
}

/// `urn:uuid:` followed by 32 hex digits of fresh randomness.
fn new_credential_id() -> String {
    format!("urn:uuid:{}", Uuid::new_v4().simple())
}
