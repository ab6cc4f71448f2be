//! # veritas-did: DID Codec
//!
//! Converts between key material and the two DID shapes Veritas issues and
//! verifies:
//!
//! - `did:ethr:<network>:<address>`, naming a 20-byte Ethereum account.
//! - `did:key:z<base58btc(multicodec ‖ public key)>`, self-certifying.
//!
//! Method dispatch is a closed tagged variant ([`DidMethod`]); adding a third
//! method means adding a variant, and every `match` in the workspace will
//! point at the places that need to handle it.
//!
//! ## Identity Extraction
//!
//! Proof validation needs an issuer *identity* to compare against the
//! address recovered from a signature. [`extract_identity()`] yields
//! [`Identity::Address`] for `did:ethr` and
//! [`Identity::RecoverFromSignature`] for `did:key`, forcing callers to
//! branch on the method instead of string-matching prefixes.

pub mod codec;
pub mod error;
pub mod method;
pub mod record;

pub use codec::{
    address_from_did_key, decode_key, encode_ethr, encode_key, extract_identity, Identity,
};
pub use error::DidError;
pub use method::{is_network_segment, DidMethod, DidPublicKey, KeyCurve};
pub use record::DidRecord;
