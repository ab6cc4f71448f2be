//! # Canonical Serialization
//!
//! Defines [`CanonicalBytes`], the only input accepted by credential and
//! presentation signing.
//!
//! ## Why a newtype
//!
//! A signature over a JSON document only verifies if the verifier rebuilds
//! exactly the bytes the signer hashed. Relying on whatever key order a
//! serializer happens to emit breaks as soon as a document crosses an
//! implementation boundary. `CanonicalBytes` has a private inner field and a
//! single constructor pipeline, so every signing and recovery path is forced
//! through the same serialization.
//!
//! ## Rules
//!
//! 1. **Reject floats.** JCS number formatting of non-integers differs
//!    between implementations; counts (followers, repositories, days) are
//!    integers.
//! 2. **Sorted keys, compact separators.** Serialization uses `serde_jcs`
//!    (RFC 8785): object members are ordered by UTF-16 code units, no
//!    insignificant whitespace.
//! 3. **Absent optionals stay absent.** Callers skip `None` fields at the
//!    serde layer; this module never inserts `null`.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by RFC 8785 canonicalization with float
/// rejection.
///
/// # Invariants
///
/// - Constructed only through [`CanonicalBytes::new()`] or
///   [`CanonicalBytes::from_value()`].
/// - Object keys are sorted; separators are compact.
/// - No floating-point numbers appear anywhere in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::FloatRejected`] if the value contains
    /// a non-integer number, or [`CanonicalizationError::SerializationFailed`]
    /// if serde cannot represent it as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(value)
    }

    /// Canonicalize an already-built JSON value.
    ///
    /// Used when a caller has to edit the document tree first, e.g. to drop
    /// the `proof` member before computing a signing input.
    pub fn from_value(value: Value) -> Result<Self, CanonicalizationError> {
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(reject_floats),
        Value::Object(map) => map.values().try_for_each(reject_floats),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn json_value_no_floats() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_:/ ]{0,40}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::btree_map("[a-zA-Z@]{1,10}", inner, 0..8)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn canonicalization_is_deterministic(value in json_value_no_floats()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        #[test]
        fn canonical_output_reparses_to_same_value(value in json_value_no_floats()) {
            let cb = CanonicalBytes::new(&value).unwrap();
            let parsed: Value = serde_json::from_slice(cb.as_bytes()).unwrap();
            prop_assert_eq!(parsed, value);
        }

        #[test]
        fn non_integer_floats_always_rejected(
            f in any::<f64>().prop_filter("non-integer", |f| f.is_finite() && f.fract() != 0.0)
        ) {
            let value = serde_json::json!({"v": f});
            prop_assert!(CanonicalBytes::new(&value).is_err());
        }
    }
}
