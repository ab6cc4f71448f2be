//! # Error Types
//!
//! Errors shared by every crate that canonicalizes documents or handles
//! timestamps. Component crates wrap these with `#[from]` in their own
//! error enums.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Counts and amounts must be integers or strings.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error constructing or manipulating a [`Timestamp`](crate::Timestamp).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// The input string is not a valid RFC 3339 timestamp.
    #[error("invalid RFC 3339 timestamp {input:?}: {reason}")]
    InvalidFormat {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The timestamp uses an offset other than `Z`.
    #[error("timestamp must use Z suffix (UTC only), got: {0:?}")]
    NonUtc(String),

    /// Valid RFC 3339, but not the `YYYY-MM-DDTHH:MM:SSZ` wire form.
    #[error("timestamp must be YYYY-MM-DDTHH:MM:SSZ, got: {0:?}")]
    NonCanonical(String),

    /// Arithmetic left the representable date range.
    #[error("timestamp arithmetic overflowed")]
    Overflow,
}
