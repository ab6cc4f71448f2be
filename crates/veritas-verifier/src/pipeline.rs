//! # Verification Pipeline

use std::sync::Arc;

use veritas_core::Timestamp;
use veritas_crypto::Address;
use veritas_did::{extract_identity, Identity};
use veritas_status::{QueryError, RegistryError, RevocationQuery};
use veritas_vc::{DidKeyPolicy, VerifiableCredential, W3C_CREDENTIALS_V1};

use crate::result::{ErrorKind, VerificationError, VerificationResult};

/// Verify `credential` now, consulting `query` for revocation if given.
pub fn verify(
    credential: &VerifiableCredential,
    query: Option<&dyn RevocationQuery>,
) -> VerificationResult {
    run(credential, query, DidKeyPolicy::default(), Timestamp::now())
}

/// A configured verifier.
#[derive(Clone, Default)]
pub struct Verifier {
    query: Option<Arc<dyn RevocationQuery>>,
    did_key_policy: DidKeyPolicy,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("revocation", &self.query.is_some())
            .field("did_key_policy", &self.did_key_policy)
            .finish()
    }
}

impl Verifier {
    /// A verifier with no revocation capability and the default
    /// `did:key` policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_revocation(mut self, query: Arc<dyn RevocationQuery>) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_did_key_policy(mut self, policy: DidKeyPolicy) -> Self {
        self.did_key_policy = policy;
        self
    }

    pub fn verify(&self, credential: &VerifiableCredential) -> VerificationResult {
        self.verify_at(credential, Timestamp::now())
    }

    /// Verify as of `now`.
    pub fn verify_at(&self, credential: &VerifiableCredential, now: Timestamp) -> VerificationResult {
        run(credential, self.query.as_deref(), self.did_key_policy, now)
    }

    /// Parse the JSON wire form and verify it.
    pub fn verify_json(&self, json: &str) -> VerificationResult {
        match VerifiableCredential::from_json(json) {
            Ok(credential) => self.verify(&credential),
            Err(e) => VerificationResult::failure((&e).into()),
        }
    }
}

fn run(
    credential: &VerifiableCredential,
    query: Option<&dyn RevocationQuery>,
    policy: DidKeyPolicy,
    now: Timestamp,
) -> VerificationResult {
    let outcome = check_structure(credential)
        .and_then(|()| check_expiration(credential, now))
        .and_then(|()| check_signature(credential, policy))
        .and_then(|signer| match query {
            Some(query) => check_revocation(credential, query, signer),
            None => Ok(()),
        });

    match outcome {
        Ok(()) => {
            tracing::info!(id = %credential.id, issuer = %credential.issuer, "credential verified");
            VerificationResult::success(&credential.issuer, credential.credential_subject.clone())
        }
        Err(error) => {
            tracing::info!(
                id = %credential.id,
                issuer = %credential.issuer,
                kind = %error.kind,
                "credential rejected: {}",
                error.message
            );
            VerificationResult::failure(error)
        }
    }
}

fn check_structure(credential: &VerifiableCredential) -> Result<(), VerificationError> {
    let malformed = |msg: &str| VerificationError::new(ErrorKind::MalformedCredential, msg);
    if credential.context.is_empty() {
        return Err(malformed("@context is empty"));
    }
    if !credential.context.iter().any(|c| c == W3C_CREDENTIALS_V1) {
        return Err(malformed("@context does not include the W3C credentials context"));
    }
    if !credential.has_vc_type() {
        return Err(malformed("type does not include VerifiableCredential"));
    }
    if credential.credential_type.iter().any(String::is_empty) {
        return Err(malformed("type contains an empty entry"));
    }
    if !is_did_shaped(&credential.issuer) {
        return Err(malformed("issuer is not a DID"));
    }
    Ok(())
}

/// `did:<method>:<id>` with a lowercase alphanumeric method and non-empty id.
fn is_did_shaped(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("did:") else {
        return false;
    };
    match rest.split_once(':') {
        Some((method, id)) => {
            !method.is_empty()
                && method
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                && !id.is_empty()
        }
        None => false,
    }
}

fn check_expiration(
    credential: &VerifiableCredential,
    now: Timestamp,
) -> Result<(), VerificationError> {
    match credential.expiration_date {
        Some(expiration) if expiration < now => Err(VerificationError::new(
            ErrorKind::Expired,
            format!("credential expired at {expiration}"),
        )),
        _ => Ok(()),
    }
}

fn check_signature(
    credential: &VerifiableCredential,
    policy: DidKeyPolicy,
) -> Result<Address, VerificationError> {
    credential
        .validate_proof(policy)
        .map_err(|e| VerificationError::from(&e))
}

fn check_revocation(
    credential: &VerifiableCredential,
    query: &dyn RevocationQuery,
    signer: Address,
) -> Result<(), VerificationError> {
    let Some(status) = &credential.credential_status else {
        return Ok(());
    };
    if !status.is_status_list_2021() {
        return Err(VerificationError::new(
            ErrorKind::UnsupportedStatusType,
            format!("unsupported credential status type {:?}", status.status_type),
        ));
    }
    let list_index = status.list_index().map_err(|e| VerificationError::from(&e))?;
    let bit_index = status.bit_index().map_err(|e| VerificationError::from(&e))?;
    let issuer = match extract_identity(&credential.issuer) {
        Ok(Identity::Address(address)) => address,
        Ok(Identity::RecoverFromSignature) => signer,
        Err(e) => return Err(VerificationError::from(&e)),
    };

    let reason = match query.is_revoked(&issuer, list_index, bit_index) {
        Ok(true) => {
            return Err(VerificationError::new(
                ErrorKind::Revoked,
                format!("revoked by {issuer} (list {list_index}, bit {bit_index})"),
            ))
        }
        Ok(false) => return Ok(()),
        Err(QueryError::Registry(RegistryError::BitIndexOutOfRange(bit))) => {
            return Err(VerificationError::new(
                ErrorKind::BitIndexOutOfRange,
                format!("registry rejected bit index {bit}"),
            ))
        }
        Err(QueryError::Unavailable(reason)) => reason,
        Err(QueryError::Registry(e)) => e.to_string(),
    };
    tracing::warn!(
        id = %credential.id,
        issuer = %issuer,
        list_index,
        bit_index,
        %reason,
        "revocation lookup failed; treating credential as not revoked"
    );
    Ok(())
}
