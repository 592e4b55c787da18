// Copyright (c) 2026 Aura PoCA Contributors
// SPDX-License-Identifier: Apache-2.0

//! Consistency scoring: the reliability-score collaborator.
//!
//! Scores an agent event against a declared constitution vector:
//! `score = 0.3 * structural + 0.7 * semantic - penalty`, clamped to
//! `[0, 1]`. The audit core consumes the resulting metadata as opaque
//! fields; nothing here reaches back into the proof subsystem.

use crate::certificate::ReliabilityMetadata;
use crate::error::{AuraError, AuraResult};
use crate::policy::{HaltSwitch, PolicyRule};
use serde::{Deserialize, Serialize};

pub const STRUCTURAL_WEIGHT: f64 = 0.3;
pub const SEMANTIC_WEIGHT: f64 = 0.7;
pub const VIOLATION_PENALTY: f64 = 0.1;

/// Minimum score for `COMPLIANT` status.
pub const COMPLIANCE_THRESHOLD: f64 = 0.8;

/// One machine-agent evaluation event, as ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    pub timestamp: String,
    pub content: String,
    pub embedding: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Compliant,
    Risk,
}

impl ComplianceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compliant => "COMPLIANT",
            Self::Risk => "RISK",
        }
    }
}

/// Scored outcome for one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub score: f64,
    pub structural: f64,
    pub semantic: f64,
    pub penalty: f64,
    pub drift: f64,
    pub status: ComplianceStatus,
}

impl Assessment {
    /// The pass-through block the certificate binder embeds verbatim.
    pub fn metadata(&self) -> ReliabilityMetadata {
        ReliabilityMetadata {
            score: self.score,
            drift: self.drift,
            status: self.status.as_str().to_string(),
        }
    }
}

fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Deterministic consistency calculator for one constitution and rule set.
///
/// The halt gate is injected; every `calculate` call checks it before any
/// scoring happens.
#[derive(Debug)]
pub struct ConsistencyCalculator {
    constitution: Vec<f64>,
    rules: Vec<PolicyRule>,
    halt: HaltSwitch,
}

impl ConsistencyCalculator {
    pub fn new(
        constitution: Vec<f64>,
        rules: Vec<PolicyRule>,
        halt: HaltSwitch,
    ) -> AuraResult<Self> {
        if constitution.is_empty() {
            return Err(AuraError::InvalidArgument(
                "constitution vector is empty".to_string(),
            ));
        }
        Ok(Self {
            constitution,
            rules,
            halt,
        })
    }

    /// Score one event. Fails with `Halted` when the injected gate is
    /// active; otherwise always produces a scored assessment, with a
    /// structurally invalid event contributing 0 structural weight.
    pub fn calculate(&self, event: &AgentEvent) -> AuraResult<Assessment> {
        self.halt.ensure_clear()?;

        let structural = if event.timestamp.is_empty()
            || event.content.is_empty()
            || event.embedding.is_empty()
        {
            0.0
        } else {
            1.0
        };
        let semantic = cosine_similarity(&event.embedding, &self.constitution);
        let violations = self.rules.iter().filter(|r| r.is_violated(event)).count();
        let penalty = violations as f64 * VIOLATION_PENALTY;

        let raw = STRUCTURAL_WEIGHT * structural + SEMANTIC_WEIGHT * semantic - penalty;
        let score = raw.clamp(0.0, 1.0);
        let status = if score > COMPLIANCE_THRESHOLD {
            ComplianceStatus::Compliant
        } else {
            ComplianceStatus::Risk
        };

        Ok(Assessment {
            score,
            structural,
            semantic,
            penalty,
            drift: 1.0 - semantic,
            status,
        })
    }
}
