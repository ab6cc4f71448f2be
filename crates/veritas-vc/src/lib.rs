//! # veritas-vc: Verifiable Credentials
//!
//! Implements the W3C Verifiable Credentials data model as Veritas issues
//! it:
//!
//! - **Credential structure** ([`VerifiableCredential`]) with an extensible
//!   `credentialSubject`, optional `credentialStatus`, and a single proof.
//! - **Claims** ([`ClaimPayload`]) for proof of employment and GitHub
//!   reputation, each with its own `type` and `@context` entry.
//! - **Builder** ([`CredentialBuilder`], [`issue_credential()`]) that assigns
//!   a fresh `urn:uuid:` identifier, timestamps and expiration.
//! - **Proof engine** ([`proof`]) that signs the canonical credential body
//!   with EIP-191 `personal_sign` and recovers the signer on validation.
//! - **Presentations** ([`VerifiablePresentation`]) signed by the holder.
//!
//! ## Security Invariants
//!
//! - Every signature is computed over
//!   [`CanonicalBytes`](veritas_core::CanonicalBytes) of the document with
//!   `proof` removed. Signer and verifier share that one routine.
//! - Any change to a signed field changes the canonical bytes, so the
//!   recovered signer no longer matches the issuer.

pub mod builder;
pub mod claim;
pub mod credential;
pub mod error;
pub mod presentation;
pub mod proof;
pub mod status;

pub use builder::{build, issue_credential, CredentialBuilder};
pub use claim::{
    ClaimKind, ClaimPayload, EmploymentClaim, GitHubReputation, GitHubReputationClaim,
    EMPLOYMENT_CONTEXT, EMPLOYMENT_CREDENTIAL_TYPE, GITHUB_CONTEXT, GITHUB_CREDENTIAL_TYPE,
    VERIFIABLE_CREDENTIAL_TYPE, W3C_CREDENTIALS_V1,
};
pub use credential::VerifiableCredential;
pub use error::VcError;
pub use presentation::{VerifiablePresentation, VERIFIABLE_PRESENTATION_TYPE};
pub use proof::{DidKeyPolicy, Proof, ProofPurpose, ProofType};
pub use status::{RevocationStatus, STATUS_LIST_2021_ENTRY, STATUS_LIST_BITS};
