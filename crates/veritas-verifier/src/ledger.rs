//! # Verifier Account Ledger
//!
//! Balances of verifier accounts, consumed by
//! [`BillingVerifier`](crate::BillingVerifier). The ledger is an injected
//! capability: callers hold an `Arc<dyn AccountLedger>` or a concrete
//! ledger, and nothing in this crate keeps process-wide account state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use subtle::ConstantTimeEq;
use thiserror::Error;
use veritas_crypto::{generate_challenge, keccak256};

/// Errors from ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("account already exists: {0}")]
    AccountExists(String),

    #[error("insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: u64, required: u64 },

    #[error("invalid API key for account {0}")]
    Unauthorized(String),

    #[error("balance overflow for account {0}")]
    Overflow(String),
}

/// A bearer credential issued when an account is opened.
///
/// Only its Keccak-256 digest is retained by [`InMemoryLedger`].
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    fn digest(&self) -> [u8; 32] {
        keccak256(self.0.as_bytes())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Storage for verifier balances.
pub trait AccountLedger: Send + Sync {
    /// Create an account with a zero balance and return its API key.
    fn open(&self, account: &str) -> Result<ApiKey, LedgerError>;

    /// Check `api_key` against the one issued for `account`.
    fn authenticate(&self, account: &str, api_key: &ApiKey) -> Result<(), LedgerError>;

    /// Add `amount`; returns the new balance.
    fn credit(&self, account: &str, amount: u64) -> Result<u64, LedgerError>;

    fn balance(&self, account: &str) -> Result<u64, LedgerError>;

    /// Deduct `amount` if the balance covers it; returns the remaining
    /// balance. Nothing is deducted on error.
    fn charge(&self, account: &str, amount: u64) -> Result<u64, LedgerError>;
}

impl<T: AccountLedger + ?Sized> AccountLedger for Arc<T> {
    fn open(&self, account: &str) -> Result<ApiKey, LedgerError> {
        (**self).open(account)
    }

    fn authenticate(&self, account: &str, api_key: &ApiKey) -> Result<(), LedgerError> {
        (**self).authenticate(account, api_key)
    }

    fn credit(&self, account: &str, amount: u64) -> Result<u64, LedgerError> {
        (**self).credit(account, amount)
    }

    fn balance(&self, account: &str) -> Result<u64, LedgerError> {
        (**self).balance(account)
    }

    fn charge(&self, account: &str, amount: u64) -> Result<u64, LedgerError> {
        (**self).charge(account, amount)
    }
}

#[derive(Debug, Clone)]
struct Account {
    key_digest: [u8; 32],
    balance: u64,
}

/// In-memory [`AccountLedger`].
///
/// The `RwLock` is `parking_lot`'s: never held across a blocking call and
/// never poisoned by a panicking writer.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

impl AccountLedger for InMemoryLedger {
    fn open(&self, account: &str) -> Result<ApiKey, LedgerError> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(account) {
            return Err(LedgerError::AccountExists(account.to_string()));
        }
        let key = ApiKey::new(generate_challenge());
        accounts.insert(
            account.to_string(),
            Account {
                key_digest: key.digest(),
                balance: 0,
            },
        );
        tracing::info!(account, "verifier account opened");
        Ok(key)
    }

    fn authenticate(&self, account: &str, api_key: &ApiKey) -> Result<(), LedgerError> {
        let accounts = self.accounts.read();
        let entry = accounts
            .get(account)
            .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?;
        if bool::from(entry.key_digest[..].ct_eq(&api_key.digest()[..])) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(account.to_string()))
        }
    }

    fn credit(&self, account: &str, amount: u64) -> Result<u64, LedgerError> {
        let mut accounts = self.accounts.write();
        let entry = accounts
            .get_mut(account)
            .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?;
        entry.balance = entry
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(account.to_string()))?;
        Ok(entry.balance)
    }

    fn balance(&self, account: &str) -> Result<u64, LedgerError> {
        self.accounts
            .read()
            .get(account)
            .map(|a| a.balance)
            .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))
    }

    fn charge(&self, account: &str, amount: u64) -> Result<u64, LedgerError> {
        let mut accounts = self.accounts.write();
        let entry = accounts
            .get_mut(account)
            .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?;
        if entry.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                balance: entry.balance,
                required: amount,
            });
        }
        entry.balance -= amount;
        Ok(entry.balance)
    }
}
