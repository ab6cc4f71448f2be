//! # veritas-verifier: Verification Pipeline
//!
//! Turns a credential into a single pass/fail decision:
//!
//! 1. **Structure**: `@context`, `type` and `issuer` present and well formed.
//! 2. **Expiration**: `expirationDate`, if present, is not before now.
//! 3. **Signature**: the proof recovers to the issuer.
//! 4. **Revocation**: when both a query capability and a
//!    `credentialStatus` are present, the issuer's status bit is clear.
//!
//! The pipeline stops at the first failing stage and reports it as a
//! [`VerificationError`] inside a [`VerificationResult`]; it never returns
//! `Err` for problems with the credential itself.
//!
//! ## Fail-Open Revocation
//!
//! When the revocation query is *unreachable*
//! ([`QueryError::Unavailable`](veritas_status::QueryError::Unavailable))
//! or refuses the lookup for any reason other than the bit index, the
//! credential is treated as not revoked and a warning is logged.
//! Semantic problems (unsupported status type, malformed status URI,
//! out-of-range bit) remain hard failures.
//!
//! ## Billing
//!
//! [`BillingVerifier`] charges a verifier account on an injected
//! [`AccountLedger`] before running the pipeline.

pub mod billing;
pub mod ledger;
pub mod pipeline;
pub mod result;

pub use billing::{BilledVerification, BillingVerifier, VERIFICATION_FEE};
pub use ledger::{AccountLedger, ApiKey, InMemoryLedger, LedgerError};
pub use pipeline::{verify, Verifier};
pub use result::{ErrorKind, VerificationError, VerificationResult};
