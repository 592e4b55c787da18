// Copyright (c) 2026 Aura PoCA Contributors
// SPDX-License-Identifier: Apache-2.0

//! Event Trust Certificates and bound compliance certificates.
//!
//! An ETC binds one leaf to its batch root through an inclusion proof and
//! is verifiable with no batch access. The bound [`EventCertificate`] is
//! the only external-facing output of the core: it carries the externally
//! supplied reliability metadata verbatim next to the audit pair and
//! fingerprints the whole record for anchoring.

use crate::error::{AuraError, AuraResult};
use crate::hash::{hash_canonical, Digest};
use crate::merkle::{verify_proof, MerkleTree, ProofStep};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Version of the frozen export field set.
pub const SCHEMA_VERSION: &str = "1.0.0";

pub(crate) fn validate_timestamp(timestamp: &str) -> AuraResult<()> {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|_| ())
        .map_err(|_| AuraError::InvalidTimestamp(timestamp.to_string()))
}

/// Event Trust Certificate (ETC).
///
/// Immutable once issued. `verify` recomputes the root from the embedded
/// leaf and proof and checks it against the embedded root; it asserts
/// internal self-consistency, not membership against an external ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTrustCertificate {
    event_hash: Digest,
    merkle_root: Digest,
    merkle_proof: Vec<ProofStep>,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch_id: Option<String>,
}

impl EventTrustCertificate {
    /// Issue an ETC for the leaf at `leaf_index` of a built batch tree.
    pub fn issue(
        tree: &MerkleTree,
        leaf_index: usize,
        timestamp: &str,
        batch_id: Option<String>,
    ) -> AuraResult<Self> {
        validate_timestamp(timestamp)?;
        let merkle_proof = tree.prove(leaf_index)?;
        let event_hash = tree.leaves()[leaf_index].clone();
        Ok(Self {
            event_hash,
            merkle_root: tree.root().clone(),
            merkle_proof,
            timestamp: timestamp.to_string(),
            batch_id,
        })
    }

    pub fn event_hash(&self) -> &Digest {
        &self.event_hash
    }

    pub fn merkle_root(&self) -> &Digest {
        &self.merkle_root
    }

    pub fn merkle_proof(&self) -> &[ProofStep] {
        &self.merkle_proof
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn batch_id(&self) -> Option<&str> {
        self.batch_id.as_deref()
    }

    pub fn verify(&self) -> bool {
        verify_proof(&self.event_hash, &self.merkle_proof, &self.merkle_root)
    }
}

/// Reliability metadata supplied by the external scoring collaborator.
///
/// Passed through verbatim; score interpretation is owned upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityMetadata {
    pub score: f64,
    pub drift: f64,
    pub status: String,
}

/// Bound compliance certificate for one evaluated event.
///
/// All fields are fixed at construction; there are no setters. The
/// fingerprint is the digest of the canonical key-sorted export shape, so
/// two certificates with identical field sets fingerprint identically no
/// matter where they were produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCertificate {
    agent_id: String,
    timestamp: String,
    ari: ReliabilityMetadata,
    leaf_hash: Digest,
    merkle_root: Digest,
}

impl EventCertificate {
    /// Bind reliability metadata to the audit pair carried by an ETC.
    pub fn bind(
        agent_id: &str,
        timestamp: &str,
        ari: ReliabilityMetadata,
        etc: &EventTrustCertificate,
    ) -> AuraResult<Self> {
        Self::from_parts(
            agent_id,
            timestamp,
            ari,
            etc.event_hash().clone(),
            etc.merkle_root().clone(),
        )
    }

    /// Bind from an explicit leaf/root pair, for callers holding the parts
    /// rather than an ETC.
    pub fn from_parts(
        agent_id: &str,
        timestamp: &str,
        ari: ReliabilityMetadata,
        leaf_hash: Digest,
        merkle_root: Digest,
    ) -> AuraResult<Self> {
        if agent_id.is_empty() {
            return Err(AuraError::InvalidArgument("agent_id is empty".to_string()));
        }
        validate_timestamp(timestamp)?;
        if !ari.score.is_finite() || !ari.drift.is_finite() {
            return Err(AuraError::InvalidArgument(
                "score and drift must be finite".to_string(),
            ));
        }
        Ok(Self {
            agent_id: agent_id.to_string(),
            timestamp: timestamp.to_string(),
            ari,
            leaf_hash,
            merkle_root,
        })
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn ari(&self) -> &ReliabilityMetadata {
        &self.ari
    }

    pub fn leaf_hash(&self) -> &Digest {
        &self.leaf_hash
    }

    pub fn merkle_root(&self) -> &Digest {
        &self.merkle_root
    }

    /// Canonical JSON-equivalent export shape, frozen per [`SCHEMA_VERSION`].
    pub fn to_value(&self) -> Value {
        json!({
            "schema_version": SCHEMA_VERSION,
            "agent_id": self.agent_id,
            "timestamp": self.timestamp,
            "ari": {
                "score": self.ari.score,
                "drift": self.ari.drift,
                "status": self.ari.status,
            },
            "audit": {
                "leaf_hash": self.leaf_hash,
                "merkle_root": self.merkle_root,
            },
        })
    }

    /// Digest of the full canonical field set; the record's externally
    /// anchorable identity.
    pub fn fingerprint(&self) -> AuraResult<Digest> {
        hash_canonical(&self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_text;
    use serde_json::json;

    const TS: &str = "2026-01-17T14:00:00Z";

    fn sample_tree() -> MerkleTree {
        MerkleTree::from_events(["event-a", "event-b", "event-c", "event-d"]).expect("tree")
    }

    fn sample_metadata() -> ReliabilityMetadata {
        ReliabilityMetadata {
            score: 0.91,
            drift: 0.04,
            status: "COMPLIANT".to_string(),
        }
    }

    #[test]
    fn issued_etc_verifies_against_its_own_root() {
        let tree = sample_tree();
        for i in 0..tree.leaf_count() {
            let etc = EventTrustCertificate::issue(&tree, i, TS, Some("batch-001".to_string()))
                .expect("etc");
            assert!(etc.verify());
            assert_eq!(etc.event_hash(), &tree.leaves()[i]);
            assert_eq!(etc.merkle_root(), tree.root());
            assert_eq!(etc.batch_id(), Some("batch-001"));
        }
    }

    #[test]
    fn etc_with_bad_timestamp_is_rejected() {
        let tree = sample_tree();
        let err = EventTrustCertificate::issue(&tree, 0, "yesterday at noon", None);
        assert!(matches!(err, Err(AuraError::InvalidTimestamp(_))));
    }

    #[test]
    fn etc_survives_serde_round_trip() {
        let tree = sample_tree();
        let etc = EventTrustCertificate::issue(&tree, 2, TS, None).expect("etc");
        let json = serde_json::to_string(&etc).expect("serialize");
        let back: EventTrustCertificate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(etc, back);
        assert!(back.verify());
    }

    #[test]
    fn externally_received_etc_with_foreign_root_fails_verify() {
        let tree = sample_tree();
        let etc = EventTrustCertificate::issue(&tree, 1, TS, None).expect("etc");
        let mut value = serde_json::to_value(&etc).expect("value");
        value["merkle_root"] = json!(hash_text("some other batch").as_str());
        let tampered: EventTrustCertificate = serde_json::from_value(value).expect("deserialize");
        assert!(!tampered.verify());
    }

    #[test]
    fn export_shape_is_frozen() {
        let tree = sample_tree();
        let etc = EventTrustCertificate::issue(&tree, 0, TS, None).expect("etc");
        let cert = EventCertificate::bind("machine_agent_001", TS, sample_metadata(), &etc)
            .expect("certificate");
        let value = cert.to_value();
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["agent_id"], "machine_agent_001");
        assert_eq!(value["timestamp"], TS);
        assert_eq!(value["ari"]["score"], 0.91);
        assert_eq!(value["ari"]["drift"], 0.04);
        assert_eq!(value["ari"]["status"], "COMPLIANT");
        assert_eq!(value["audit"]["leaf_hash"], tree.leaves()[0].as_str());
        assert_eq!(value["audit"]["merkle_root"], tree.root().as_str());
    }

    #[test]
    fn identical_field_sets_fingerprint_identically() {
        let tree = sample_tree();
        let etc = EventTrustCertificate::issue(&tree, 0, TS, None).expect("etc");
        let a = EventCertificate::bind("agent", TS, sample_metadata(), &etc).expect("a");
        let b = EventCertificate::from_parts(
            "agent",
            TS,
            sample_metadata(),
            tree.leaves()[0].clone(),
            tree.root().clone(),
        )
        .expect("b");
        assert_eq!(
            a.fingerprint().expect("fingerprint"),
            b.fingerprint().expect("fingerprint")
        );
    }

    #[test]
    fn fingerprint_changes_when_any_field_changes() {
        let tree = sample_tree();
        let etc = EventTrustCertificate::issue(&tree, 0, TS, None).expect("etc");
        let base = EventCertificate::bind("agent", TS, sample_metadata(), &etc).expect("base");
        let base_fp = base.fingerprint().expect("fingerprint");

        let variants = [
            EventCertificate::bind("agent-2", TS, sample_metadata(), &etc).expect("agent"),
            EventCertificate::bind("agent", "2026-01-18T09:30:00Z", sample_metadata(), &etc)
                .expect("timestamp"),
            EventCertificate::bind(
                "agent",
                TS,
                ReliabilityMetadata {
                    score: 0.92,
                    ..sample_metadata()
                },
                &etc,
            )
            .expect("score"),
            EventCertificate::bind(
                "agent",
                TS,
                ReliabilityMetadata {
                    drift: 0.05,
                    ..sample_metadata()
                },
                &etc,
            )
            .expect("drift"),
            EventCertificate::bind(
                "agent",
                TS,
                ReliabilityMetadata {
                    status: "RISK".to_string(),
                    ..sample_metadata()
                },
                &etc,
            )
            .expect("status"),
            EventCertificate::from_parts(
                "agent",
                TS,
                sample_metadata(),
                tree.leaves()[1].clone(),
                tree.root().clone(),
            )
            .expect("leaf"),
        ];
        for variant in &variants {
            assert_ne!(variant.fingerprint().expect("fingerprint"), base_fp);
        }
    }

    #[test]
    fn malformed_binding_inputs_are_typed_failures() {
        let tree = sample_tree();
        let etc = EventTrustCertificate::issue(&tree, 0, TS, None).expect("etc");

        assert!(matches!(
            EventCertificate::bind("", TS, sample_metadata(), &etc),
            Err(AuraError::InvalidArgument(_))
        ));
        assert!(matches!(
            EventCertificate::bind("agent", "17/01/2026", sample_metadata(), &etc),
            Err(AuraError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            EventCertificate::bind(
                "agent",
                TS,
                ReliabilityMetadata {
                    score: f64::NAN,
                    ..sample_metadata()
                },
                &etc,
            ),
            Err(AuraError::InvalidArgument(_))
        ));
        assert!(matches!(
            EventCertificate::bind(
                "agent",
                TS,
                ReliabilityMetadata {
                    drift: f64::INFINITY,
                    ..sample_metadata()
                },
                &etc,
            ),
            Err(AuraError::InvalidArgument(_))
        ));
    }

    #[test]
    fn timestamps_with_offsets_are_accepted() {
        assert!(validate_timestamp("2026-01-17T14:00:00+02:00").is_ok());
        assert!(validate_timestamp("2026-01-17T14:00:00.123Z").is_ok());
        assert!(validate_timestamp("2026-01-17").is_err());
        assert!(validate_timestamp("").is_err());
    }
}
