//! # Revocation Query Capability
//!
//! The verifier only needs `isRevoked(issuer, list, bit)`. This module
//! defines that capability and its implementations:
//!
//! - [`RevocationRegistry`] answers in-process.
//! - [`ContractQuery`] encodes an `isRevoked` call and hands it to a
//!   [`CallTransport`] (an RPC client, in a deployment).
//! - [`UnavailableQuery`] always fails as unreachable.
//!
//! Transport failures surface as [`QueryError::Unavailable`]; the verifier
//! treats those as "not revoked". Everything else is a
//! [`QueryError::Registry`] and stays a hard failure.

use std::sync::Arc;

use thiserror::Error;
use veritas_crypto::Address;

use crate::abi::{self, RegistryCall};
use crate::error::QueryError;
use crate::registry::RevocationRegistry;

/// Read-only revocation lookup.
pub trait RevocationQuery: Send + Sync {
    fn is_revoked(
        &self,
        issuer: &Address,
        list_index: u64,
        bit_index: u64,
    ) -> Result<bool, QueryError>;
}

impl RevocationQuery for RevocationRegistry {
    fn is_revoked(
        &self,
        issuer: &Address,
        list_index: u64,
        bit_index: u64,
    ) -> Result<bool, QueryError> {
        Ok(self.get_bit(issuer, list_index, bit_index)?)
    }
}

impl<T: RevocationQuery + ?Sized> RevocationQuery for Arc<T> {
    fn is_revoked(
        &self,
        issuer: &Address,
        list_index: u64,
        bit_index: u64,
    ) -> Result<bool, QueryError> {
        (**self).is_revoked(issuer, list_index, bit_index)
    }
}

impl<T: RevocationQuery + ?Sized> RevocationQuery for &T {
    fn is_revoked(
        &self,
        issuer: &Address,
        list_index: u64,
        bit_index: u64,
    ) -> Result<bool, QueryError> {
        (**self).is_revoked(issuer, list_index, bit_index)
    }
}

/// A read channel that could not deliver a call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// Delivers read-only contract calldata and returns the raw return data.
pub trait CallTransport: Send + Sync {
    fn call(&self, calldata: &[u8]) -> Result<Vec<u8>, TransportError>;
}

impl<T: CallTransport + ?Sized> CallTransport for Arc<T> {
    fn call(&self, calldata: &[u8]) -> Result<Vec<u8>, TransportError> {
        (**self).call(calldata)
    }
}

/// The in-process registry as a read-only contract endpoint.
impl CallTransport for RevocationRegistry {
    fn call(&self, calldata: &[u8]) -> Result<Vec<u8>, TransportError> {
        let call = RegistryCall::decode(calldata).map_err(|e| TransportError(e.to_string()))?;
        if call.is_write() {
            return Err(TransportError("write calls require a signed transaction".into()));
        }
        self.execute(&Address::ZERO, calldata)
            .map(|outcome| outcome.output)
            .map_err(|e| TransportError(e.to_string()))
    }
}

/// Answers revocation queries through contract calls.
#[derive(Debug, Clone)]
pub struct ContractQuery<T> {
    transport: T,
}

impl<T: CallTransport> ContractQuery<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: CallTransport> RevocationQuery for ContractQuery<T> {
    fn is_revoked(
        &self,
        issuer: &Address,
        list_index: u64,
        bit_index: u64,
    ) -> Result<bool, QueryError> {
        let calldata = RegistryCall::IsRevoked {
            issuer: *issuer,
            list_index,
            bit_index,
        }
        .encode();
        let output = self
            .transport
            .call(&calldata)
            .map_err(|e| QueryError::Unavailable(e.to_string()))?;
        abi::decode_bool(&output)
            .map_err(|e| QueryError::Unavailable(format!("malformed isRevoked response: {e}")))
    }
}

/// A query that is never reachable.
#[derive(Debug, Clone, Default)]
pub struct UnavailableQuery {
    reason: String,
}

impl UnavailableQuery {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl RevocationQuery for UnavailableQuery {
    fn is_revoked(&self, _: &Address, _: u64, _: u64) -> Result<bool, QueryError> {
        Err(QueryError::Unavailable(if self.reason.is_empty() {
            "no revocation endpoint configured".to_string()
        } else {
            self.reason.clone()
        }))
    }
}
