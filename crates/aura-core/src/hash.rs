// Copyright (c) 2026 Aura PoCA Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::error::{AuraError, AuraResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Hex length of a SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// A SHA-256 digest as a lowercase hex string.
///
/// The hex representation is the wire format and also the hashing substrate:
/// parent nodes hash the UTF-8 bytes of the two concatenated child hex
/// strings. Existing roots and proofs depend on that byte-level discipline,
/// so digests stay hex all the way through instead of round-tripping via
/// `[u8; 32]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    pub fn from_hex(s: impl Into<String>) -> AuraResult<Self> {
        let s = s.into();
        let well_formed = s.len() == DIGEST_HEX_LEN
            && s.bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(s))
        } else {
            Err(AuraError::InvalidDigest(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Digest {
    type Error = AuraError;

    fn try_from(s: String) -> AuraResult<Self> {
        Self::from_hex(s)
    }
}

impl From<Digest> for String {
    fn from(d: Digest) -> Self {
        d.0
    }
}

fn sha256_hex(bytes: &[u8]) -> Digest {
    let mut h = Sha256::new();
    h.update(bytes);
    Digest(hex::encode(h.finalize()))
}

/// Digest of a raw text leaf: SHA-256 over the UTF-8 bytes.
pub fn hash_text(input: &str) -> Digest {
    sha256_hex(input.as_bytes())
}

/// Parent digest of two child digests, left always before right.
pub(crate) fn hash_pair(left: &Digest, right: &Digest) -> Digest {
    let mut buf = String::with_capacity(2 * DIGEST_HEX_LEN);
    buf.push_str(&left.0);
    buf.push_str(&right.0);
    sha256_hex(buf.as_bytes())
}

fn sort_json(v: Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, val) in entries {
                sorted.insert(k, sort_json(val));
            }
            Value::Object(sorted)
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(sort_json).collect()),
        other => other,
    }
}

/// Canonical serialization of structured data: keys sorted lexicographically
/// at every depth, compact encoding, no whitespace.
pub fn canonical_json(v: &impl Serialize) -> AuraResult<Vec<u8>> {
    let value = serde_json::to_value(v)?;
    let sorted = sort_json(value);
    Ok(serde_json::to_vec(&sorted)?)
}

/// Digest of a structured leaf: canonicalize, then hash. Two structurally
/// equal records in different key order hash identically.
pub fn hash_canonical(v: &impl Serialize) -> AuraResult<Digest> {
    Ok(sha256_hex(&canonical_json(v)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_digest_is_lowercase_hex_sha256() {
        let d = hash_text("event-a");
        assert_eq!(
            d.as_str(),
            "2edb68c52e4b9cf2c91e5752b72821bb9c0f45373c9fe9143f85453a5c76bd90"
        );
    }

    #[test]
    fn key_order_does_not_affect_canonical_digest() {
        let forward = json!({"a": 1.0, "b": 2.0});
        let backward = json!({"b": 2.0, "a": 1.0});
        let fd = hash_canonical(&forward).expect("canonical");
        let bd = hash_canonical(&backward).expect("canonical");
        assert_eq!(fd, bd);
        assert_eq!(
            fd.as_str(),
            "903f074436ae1707943c92e2e545134393177c793068a69b685f3f231b51e8a5"
        );
    }

    #[test]
    fn nested_objects_are_sorted_at_every_depth() {
        let a = json!({"outer": {"z": 1, "a": {"y": 2, "b": 3}}, "top": true});
        let b = json!({"top": true, "outer": {"a": {"b": 3, "y": 2}, "z": 1}});
        assert_eq!(
            canonical_json(&a).expect("canonical"),
            canonical_json(&b).expect("canonical")
        );
    }

    #[test]
    fn digest_rejects_malformed_hex() {
        assert!(Digest::from_hex("abc").is_err());
        assert!(Digest::from_hex("G".repeat(64)).is_err());
        assert!(Digest::from_hex("A".repeat(64)).is_err(), "uppercase hex");
        assert!(Digest::from_hex("a".repeat(64)).is_ok());
    }

    #[test]
    fn digest_serde_round_trip_validates() {
        let d = hash_text("x");
        let json = serde_json::to_string(&d).expect("serialize");
        let back: Digest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(d, back);
        assert!(serde_json::from_str::<Digest>("\"not-hex\"").is_err());
    }
}
