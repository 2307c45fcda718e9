//! Round parameters for orchestrator loop control.
//!
//! [`RoundParams`] groups the static parameters that control how the
//! [`ConsensusOrchestrator`](crate::use_cases::reach_consensus::ConsensusOrchestrator)
//! consults its agents. These are application-layer concerns, not domain policy.

use magi_domain::TieBreak;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Round control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundParams {
    /// Upper bound for each agent's analysis; `None` waits indefinitely.
    pub agent_timeout: Option<Duration>,
    /// Consult agents concurrently instead of one after another.
    pub concurrent: bool,
    /// Flag the decision when votes oppose each other (opt-in heuristic).
    pub detect_conflicts: bool,
    /// How ties at the top of the count are resolved.
    pub tie_break: TieBreak,
}

impl Default for RoundParams {
    fn default() -> Self {
        Self {
            agent_timeout: Some(Duration::from_secs(30)),
            concurrent: true,
            detect_conflicts: false,
            tie_break: TieBreak::FirstSeen,
        }
    }
}

impl RoundParams {
    // ==================== Builder Methods ====================

    pub fn with_agent_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn with_detect_conflicts(mut self, detect: bool) -> Self {
        self.detect_conflicts = detect;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = RoundParams::default();
        assert_eq!(params.agent_timeout, Some(Duration::from_secs(30)));
        assert!(params.concurrent);
        assert!(!params.detect_conflicts);
        assert_eq!(params.tie_break, TieBreak::FirstSeen);
    }

    #[test]
    fn test_builders() {
        let params = RoundParams::default()
            .with_agent_timeout(None)
            .with_concurrent(false)
            .with_detect_conflicts(true)
            .with_tie_break(TieBreak::Hold);
        assert_eq!(params.agent_timeout, None);
        assert!(!params.concurrent);
        assert!(params.detect_conflicts);
        assert_eq!(params.tie_break, TieBreak::Hold);
    }
}
