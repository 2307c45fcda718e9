//! Raw analysis output produced by an analyst

use super::action::Action;
use super::vote::AgentVote;
use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Confidence assumed when an analyst omits it
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Unvalidated recommendation as returned by an analyst
///
/// Mirrors the loose `{action, confidence, reasoning}` mapping analysts
/// produce (and that callers may pre-compute and hand to a round).
/// [`AnalysisReport::into_vote`] applies the defaults and validates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Free-form action string, parsed case-insensitively
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl AnalysisReport {
    pub fn new(action: impl Into<String>, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            confidence: Some(confidence),
            reasoning: Some(reasoning.into()),
        }
    }

    /// The parsed action; unrecognized strings fall back to `HOLD`
    pub fn parsed_action(&self) -> Action {
        Action::parse_or_hold(&self.action)
    }

    /// Convert into a validated vote for `agent_name`
    ///
    /// Missing confidence defaults to 0.5, missing reasoning to the empty
    /// string (which then fails the minimum-length check).
    pub fn into_vote(self, agent_name: impl Into<String>) -> Result<AgentVote, ValidationError> {
        let action = self.parsed_action();
        AgentVote::new(
            agent_name,
            action,
            self.confidence.unwrap_or(DEFAULT_CONFIDENCE),
            self.reasoning.unwrap_or_default(),
        )
    }
}
