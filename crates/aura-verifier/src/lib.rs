// Copyright (c) 2026 Aura PoCA Contributors
// SPDX-License-Identifier: Apache-2.0

//! aura-verifier
//!
//! Standalone verification of Aura PoCA inclusion proofs, Event Trust
//! Certificates, and certificate fingerprints. This is the crate a third
//! party with no batch access runs against received artifacts, so every
//! entry point is total over untrusted input: malformed digests, unknown
//! direction tags, or missing fields are verification failure (`false`),
//! never a structural error.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Hex length of a SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// One wire-format proof step, as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: String,
    pub direction: String,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

fn is_hex_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN
        && s.bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Recompute a root from a leaf digest and an inclusion proof, leaf-to-root
/// fold order, and compare it with `expected_root`.
///
/// `left` means the sibling is concatenated before the running hash,
/// `right` after; the parent digest is SHA-256 over the concatenated hex
/// strings. Anything malformed fails verification.
pub fn verify_proof(leaf: &str, proof: &[ProofStep], expected_root: &str) -> bool {
    if !is_hex_digest(leaf) || !is_hex_digest(expected_root) {
        return false;
    }
    let mut current = leaf.to_string();
    for step in proof {
        if !is_hex_digest(&step.sibling) {
            return false;
        }
        current = match step.direction.as_str() {
            "left" => sha256_hex(format!("{}{}", step.sibling, current).as_bytes()),
            "right" => sha256_hex(format!("{}{}", current, step.sibling).as_bytes()),
            _ => return false,
        };
    }
    current == expected_root
}

/// Verify a serialized Event Trust Certificate for internal self-consistency:
/// its embedded proof must recompute its embedded root from its embedded
/// leaf. Asserts nothing about membership in any external ledger.
pub fn verify_etc(etc: &Value) -> bool {
    let (Some(leaf), Some(root), Some(steps)) = (
        etc.get("event_hash").and_then(Value::as_str),
        etc.get("merkle_root").and_then(Value::as_str),
        etc.get("merkle_proof").and_then(Value::as_array),
    ) else {
        return false;
    };
    let mut proof = Vec::with_capacity(steps.len());
    for step in steps {
        let Ok(step) = serde_json::from_value::<ProofStep>(step.clone()) else {
            return false;
        };
        proof.push(step);
    }
    verify_proof(leaf, &proof, root)
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

/// Canonical key-sorted serialization, identical to the producer's
/// canonicalization discipline.
pub fn canonical_json(v: &impl Serialize) -> serde_json::Result<Vec<u8>> {
    let value = serde_json::to_value(v)?;
    let sorted = sort_json(value);
    serde_json::to_vec(&sorted)
}

/// Fingerprint of a certificate's full canonical field set, lowercase hex.
pub fn fingerprint_hex(v: &impl Serialize) -> serde_json::Result<String> {
    Ok(sha256_hex(&canonical_json(v)?))
}

/// Check a received certificate record against a claimed fingerprint.
pub fn verify_fingerprint(record: &Value, claimed: &str) -> bool {
    match fingerprint_hex(record) {
        Ok(actual) => actual == claimed,
        Err(_) => false,
    }
}
