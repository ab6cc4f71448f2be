//! # veritas-crypto: Cryptographic Primitives
//!
//! The signing scheme behind every Veritas proof is Ethereum's
//! `personal_sign` (EIP-191) over secp256k1: the message is prefixed with
//! `"\x19Ethereum Signed Message:\n" + len`, hashed with Keccak-256, and
//! signed with a recoverable ECDSA signature. Anyone holding the message
//! and the 65-byte signature can recover the signer's [`Address`] without
//! knowing it in advance.
//!
//! - **Keccak-256** ([`keccak256`]).
//! - **Key pairs** ([`SecpKeyPair`]) that never serialize their secret.
//! - **Addresses** ([`Address`]) rendered with EIP-55 checksums.
//! - **Personal messages** ([`sign_personal_message`], [`recover_address`],
//!   [`verify_personal_message`]) over arbitrary bytes or
//!   [`CanonicalBytes`](veritas_core::CanonicalBytes).
//! - **Challenges** ([`generate_challenge`]) for presentation requests.
//!
//! ## Crate Policy
//!
//! - Depends only on `veritas-core` internally.
//! - No mocking of cryptographic operations in tests.

pub mod address;
pub mod challenge;
pub mod error;
pub mod keccak;
pub mod personal;
pub mod secp256k1;

pub use address::Address;
pub use challenge::generate_challenge;
pub use error::CryptoError;
pub use keccak::keccak256;
pub use personal::{
    personal_message_hash, recover_address, recover_public_key, sign_personal_message,
    verify_personal_message,
};
pub use secp256k1::{RecoverableSignature, SecpKeyPair, SecpPublicKey};
