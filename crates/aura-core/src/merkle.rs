// Copyright (c) 2026 Aura PoCA Contributors
// SPDX-License-Identifier: Apache-2.0

//! Deterministic merkle batch trees and per-leaf inclusion proofs.
//!
//! Leaf order is caller-supplied and load-bearing: the same event set in a
//! different order yields a different root. An odd trailing node at any
//! level is paired with itself (duplicate-and-hash), never promoted; both
//! the root value and the proof shape depend on that policy.

use crate::error::{AuraError, AuraResult};
use crate::hash::{hash_pair, hash_text, Digest};
use serde::{Deserialize, Serialize};

/// Which side of the concatenation a proof sibling lands on when the root
/// is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// One level of an inclusion proof, leaf-to-root order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Digest,
    pub direction: Side,
}

/// A complete batch hash tree, built once and read-only thereafter.
///
/// All intermediate levels are retained; proof generation needs them.
/// Level 0 holds the leaf digests, the last level holds exactly the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a tree over an ordered, non-empty sequence of leaf digests.
    ///
    /// A single leaf is the root unchanged, with no self-hashing.
    pub fn build(leaves: Vec<Digest>) -> AuraResult<Self> {
        if leaves.is_empty() {
            return Err(AuraError::EmptyBatch);
        }
        let mut levels = vec![leaves];
        loop {
            let next = {
                let current = &levels[levels.len() - 1];
                if current.len() == 1 {
                    break;
                }
                let mut next = Vec::with_capacity(current.len().div_ceil(2));
                for pair in current.chunks(2) {
                    let left = &pair[0];
                    let right = pair.get(1).unwrap_or(left);
                    next.push(hash_pair(left, right));
                }
                next
            };
            levels.push(next);
        }
        Ok(Self { levels })
    }

    /// Build a tree from raw event payloads, hashing each into a leaf first.
    pub fn from_events<I, S>(events: I) -> AuraResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(events.into_iter().map(|e| hash_text(e.as_ref())).collect())
    }

    pub fn root(&self) -> &Digest {
        &self.levels[self.levels.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    pub fn leaf(&self, leaf_index: usize) -> Option<&Digest> {
        self.levels[0].get(leaf_index)
    }

    /// Inclusion proof for the leaf at `leaf_index`, one step per level
    /// below the root.
    ///
    /// Even positions take the sibling at `i + 1` on the right, falling back
    /// to the node's own digest when the level ends there (the builder's
    /// self-pair policy). Odd positions take `i - 1` on the left.
    pub fn prove(&self, leaf_index: usize) -> AuraResult<Vec<ProofStep>> {
        let leaf_count = self.leaf_count();
        if leaf_index >= leaf_count {
            return Err(AuraError::IndexOutOfRange {
                index: leaf_index,
                leaf_count,
            });
        }

        let mut proof = Vec::with_capacity(self.levels.len() - 1);
        let mut idx = leaf_index;
        for level in &self.levels[..self.levels.len() - 1] {
            let step = if idx % 2 == 0 {
                ProofStep {
                    sibling: level.get(idx + 1).unwrap_or(&level[idx]).clone(),
                    direction: Side::Right,
                }
            } else {
                ProofStep {
                    sibling: level[idx - 1].clone(),
                    direction: Side::Left,
                }
            };
            proof.push(step);
            idx /= 2;
        }
        Ok(proof)
    }
}

/// Recompute a root from a leaf digest and an inclusion proof and compare
/// it with `expected_root`.
///
/// Pure fold with no tree access; this is the function a third party with
/// no batch access runs. Total over arbitrary input: any mismatch is
/// `false`, never an error.
pub fn verify_proof(leaf: &Digest, proof: &[ProofStep], expected_root: &Digest) -> bool {
    let mut current = leaf.clone();
    for step in proof {
        current = match step.direction {
            Side::Left => hash_pair(&step.sibling, &current),
            Side::Right => hash_pair(&current, &step.sibling),
        };
    }
    current == *expected_root
}
