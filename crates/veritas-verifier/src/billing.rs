//! # Fee-Charging Verification

use serde::{Deserialize, Serialize};
use veritas_vc::VerifiableCredential;

use crate::ledger::{AccountLedger, ApiKey, LedgerError};
use crate::pipeline::Verifier;
use crate::result::VerificationResult;

/// Units charged per verification.
pub const VERIFICATION_FEE: u64 = 1;

/// The outcome of a paid verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BilledVerification {
    pub result: VerificationResult,
    pub fee_charged: u64,
    pub remaining_balance: u64,
}

/// Charges a verifier account, then runs the pipeline.
///
/// The fee is taken before verification and is not refunded when the
/// credential is rejected: the charge pays for the check, not for a
/// positive answer.
#[derive(Debug)]
pub struct BillingVerifier<L> {
    ledger: L,
    verifier: Verifier,
    fee: u64,
}

impl<L: AccountLedger> BillingVerifier<L> {
    pub fn new(ledger: L, verifier: Verifier) -> Self {
        Self {
            ledger,
            verifier,
            fee: VERIFICATION_FEE,
        }
    }

    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Charge `account` and verify `credential`.
    ///
    /// Fails with [`LedgerError::AccountNotFound`] or
    /// [`LedgerError::InsufficientBalance`] without running the pipeline.
    pub fn verify_with_fee(
        &self,
        account: &str,
        credential: &VerifiableCredential,
    ) -> Result<BilledVerification, LedgerError> {
        let remaining_balance = self.ledger.charge(account, self.fee)?;
        tracing::info!(account, fee = self.fee, remaining_balance, "verification fee charged");
        let result = self.verifier.verify(credential);
        Ok(BilledVerification {
            result,
            fee_charged: self.fee,
            remaining_balance,
        })
    }

    /// [`verify_with_fee()`](Self::verify_with_fee) after checking the
    /// account's API key.
    pub fn verify_authenticated(
        &self,
        account: &str,
        api_key: &ApiKey,
        credential: &VerifiableCredential,
    ) -> Result<BilledVerification, LedgerError> {
        self.ledger.authenticate(account, api_key)?;
        self.verify_with_fee(account, credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use veritas_crypto::SecpKeyPair;
    use veritas_did::DidMethod;
    use veritas_vc::{ClaimPayload, CredentialBuilder, EmploymentClaim};

    use crate::ledger::InMemoryLedger;
    use crate::result::ErrorKind;

    fn credential() -> VerifiableCredential {
        let key = SecpKeyPair::generate();
        let issuer = DidMethod::ethr_for("polygon", &key).to_string();
        let claim = ClaimPayload::Employment(EmploymentClaim {
            id: String::new(),
            employer: "Acme".into(),
            role: "Engineer".into(),
            start_date: "2023-01-01".into(),
            end_date: None,
        });
        CredentialBuilder::new(claim, issuer, "did:key:zholder")
            .issue(&key)
            .unwrap()
    }

    fn funded(amount: u64) -> (BillingVerifier<Arc<InMemoryLedger>>, ApiKey) {
        let ledger = Arc::new(InMemoryLedger::new());
        let key = ledger.open("verifier-1").unwrap();
        ledger.credit("verifier-1", amount).unwrap();
        (BillingVerifier::new(ledger, Verifier::new()), key)
    }

    #[test]
    fn charges_one_unit_per_verification() {
        let (billing, _) = funded(3);
        let billed = billing.verify_with_fee("verifier-1", &credential()).unwrap();
        assert!(billed.result.verified);
        assert_eq!(billed.fee_charged, VERIFICATION_FEE);
        assert_eq!(billed.remaining_balance, 2);
        assert_eq!(billing.ledger().balance("verifier-1").unwrap(), 2);
    }

    #[test]
    fn rejected_credentials_still_cost_the_fee() {
        let (billing, _) = funded(1);
        let mut vc = credential();
        vc.credential_subject["role"] = "CEO".into();
        let billed = billing.verify_with_fee("verifier-1", &vc).unwrap();
        assert_eq!(billed.result.error_kinds(), vec![ErrorKind::InvalidSignature]);
        assert_eq!(billed.remaining_balance, 0);
    }

    #[test]
    fn empty_balance_blocks_verification() {
        let (billing, _) = funded(0);
        assert_eq!(
            billing.verify_with_fee("verifier-1", &credential()),
            Err(LedgerError::InsufficientBalance {
                balance: 0,
                required: 1
            })
        );
    }

    #[test]
    fn unknown_account_is_rejected() {
        let (billing, _) = funded(5);
        assert!(matches!(
            billing.verify_with_fee("nobody", &credential()),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn authenticated_path_checks_key_before_charging() {
        let (billing, key) = funded(5);
        let bad = ApiKey::new("0x00");
        assert!(matches!(
            billing.verify_authenticated("verifier-1", &bad, &credential()),
            Err(LedgerError::Unauthorized(_))
        ));
        assert_eq!(billing.ledger().balance("verifier-1").unwrap(), 5);

        let billed = billing
            .verify_authenticated("verifier-1", &key, &credential())
            .unwrap();
        assert_eq!(billed.remaining_balance, 4);
    }

    #[test]
    fn custom_fee() {
        let (billing, _) = funded(10);
        let billing = billing.with_fee(4);
        let billed = billing.verify_with_fee("verifier-1", &credential()).unwrap();
        assert_eq!(billed.fee_charged, 4);
        assert_eq!(billed.remaining_balance, 6);
    }

    #[test]
    fn serializes_camel_case() {
        let (billing, _) = funded(1);
        let billed = billing.verify_with_fee("verifier-1", &credential()).unwrap();
        let json = serde_json::to_value(&billed).unwrap();
        assert_eq!(json["feeCharged"], 1);
        assert_eq!(json["remainingBalance"], 0);
        assert_eq!(json["result"]["verified"], true);
    }
}
