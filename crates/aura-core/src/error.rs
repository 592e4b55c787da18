// Copyright (c) 2026 Aura PoCA Contributors
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type AuraResult<T> = Result<T, AuraError>;

/// Failure taxonomy for the audit core.
///
/// Construction failures are typed and surfaced at the point of call;
/// proof verification never goes through this enum, it reports a plain
/// `bool` so it stays total over adversarial input.
#[derive(Debug, Error)]
pub enum AuraError {
    #[error("cannot build a merkle tree from an empty batch")]
    EmptyBatch,

    #[error("leaf index {index} out of range for {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },

    #[error("not a 64-character lowercase hex digest: {0:?}")]
    InvalidDigest(String),

    #[error("invalid timestamp {0:?}: expected RFC 3339")]
    InvalidTimestamp(String),

    #[error("payload cannot be canonicalized: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("evaluation halted by {activated_by}: {reason}")]
    Halted {
        activated_by: String,
        reason: String,
    },
}
