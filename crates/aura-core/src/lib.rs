// Copyright (c) 2026 Aura PoCA Contributors
// SPDX-License-Identifier: Apache-2.0

//! aura-core
//!
//! Core of the *Aura PoCA* (Proof-of-Consistent-Agency) compliance-evidence
//! generator for machine-agent evaluation events.
//!
//! This crate implements:
//! - Canonical hashing (SHA-256, lowercase hex, key-sorted JSON canonicalization)
//! - Deterministic merkle batch trees with per-leaf inclusion proofs
//! - Pure proof verification, safe over untrusted input
//! - Event Trust Certificates (ETC) and bound, fingerprintable
//!   compliance certificates
//! - The scoring collaborator: deterministic embeddings, algorithmic policy
//!   rules, an injected emergency-halt gate, and the consistency calculator

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod certificate;
pub mod consistency;
pub mod embedding;
pub mod error;
pub mod hash;
pub mod merkle;
pub mod policy;

pub use crate::error::{AuraError, AuraResult};
pub use crate::hash::Digest;
pub use crate::merkle::{verify_proof, MerkleTree, ProofStep, Side};
