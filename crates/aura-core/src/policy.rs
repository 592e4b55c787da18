// Copyright (c) 2026 Aura PoCA Contributors
// SPDX-License-Identifier: Apache-2.0

//! Algorithmic policy rules and the emergency-halt gate.
//!
//! Rules are pure predicates over an event; there is no human-in-the-loop
//! evaluation path. The halt switch is an injected, cloneable handle rather
//! than process-wide ambient state, so the proof subsystem stays pure and
//! independently testable.

use crate::consistency::AgentEvent;
use crate::error::{AuraError, AuraResult};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A named, purely algorithmic policy check. Returns `true` when the event
/// violates the policy.
pub struct PolicyRule {
    name: String,
    check: Box<dyn Fn(&AgentEvent) -> bool + Send + Sync>,
}

impl PolicyRule {
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&AgentEvent) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_violated(&self, event: &AgentEvent) -> bool {
        (self.check)(event)
    }
}

impl fmt::Debug for PolicyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Who halted the system, why, and when (RFC 3339 UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HaltRecord {
    pub activated_by: String,
    pub reason: String,
    pub activated_at: String,
}

/// Manual emergency-halt gate.
///
/// Cloned handles share state; evaluation paths call [`HaltSwitch::ensure_clear`]
/// before scoring. Never constructed as a global singleton: callers create
/// one and pass it into the scoring collaborator.
#[derive(Debug, Clone, Default)]
pub struct HaltSwitch {
    state: Arc<Mutex<Option<HaltRecord>>>,
}

impl HaltSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate the halt. Returns the record now in force; a second
    /// activation leaves the original record in place.
    pub fn activate(&self, activated_by: &str, reason: &str) -> HaltRecord {
        let mut state = self.state.lock();
        state
            .get_or_insert_with(|| HaltRecord {
                activated_by: activated_by.to_string(),
                reason: reason.to_string(),
                activated_at: chrono::Utc::now().to_rfc3339(),
            })
            .clone()
    }

    /// Clear the halt, returning the record that was in force.
    pub fn deactivate(&self) -> Option<HaltRecord> {
        self.state.lock().take()
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().is_some()
    }

    pub fn status(&self) -> Option<HaltRecord> {
        self.state.lock().clone()
    }

    /// Typed gate check: `Halted` when the switch is active.
    pub fn ensure_clear(&self) -> AuraResult<()> {
        match self.state.lock().as_ref() {
            Some(record) => Err(AuraError::Halted {
                activated_by: record.activated_by.clone(),
                reason: record.reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(content: &str) -> AgentEvent {
        AgentEvent {
            timestamp: "2026-01-17T14:00:00Z".to_string(),
            content: content.to_string(),
            embedding: vec![0.5; 8],
        }
    }

    #[test]
    fn rule_flags_violations() {
        let rule = PolicyRule::new("max_content_length", |e: &AgentEvent| e.content.len() > 1000);
        assert!(rule.is_violated(&event(&"x".repeat(1001))));
        assert!(!rule.is_violated(&event("short")));
        assert_eq!(rule.name(), "max_content_length");
    }

    #[test]
    fn halt_switch_starts_inactive() {
        let halt = HaltSwitch::new();
        assert!(!halt.is_active());
        assert!(halt.status().is_none());
        assert!(halt.ensure_clear().is_ok());
    }

    #[test]
    fn activation_blocks_and_deactivation_clears() {
        let halt = HaltSwitch::new();
        let record = halt.activate("operator_001", "testing emergency halt");
        assert!(halt.is_active());
        assert_eq!(record.activated_by, "operator_001");

        let err = halt.ensure_clear().expect_err("halted");
        assert!(matches!(err, AuraError::Halted { .. }));
        assert_eq!(
            err.to_string(),
            "evaluation halted by operator_001: testing emergency halt"
        );

        let cleared = halt.deactivate().expect("was active");
        assert_eq!(cleared, record);
        assert!(halt.ensure_clear().is_ok());
        assert!(halt.deactivate().is_none());
    }

    #[test]
    fn second_activation_keeps_the_original_record() {
        let halt = HaltSwitch::new();
        let first = halt.activate("operator_001", "first");
        let second = halt.activate("operator_002", "second");
        assert_eq!(first, second);
        assert_eq!(
            halt.status().expect("active").activated_by,
            "operator_001"
        );
    }

    #[test]
    fn cloned_handles_share_state() {
        let halt = HaltSwitch::new();
        let handle = halt.clone();
        halt.activate("operator_001", "shared");
        assert!(handle.is_active());
        handle.deactivate();
        assert!(!halt.is_active());
    }
}
