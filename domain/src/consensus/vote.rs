//! Vote types for consensus rounds
//!
//! An [`AgentVote`] is one agent's recommendation for one round. It is
//! validated on construction and never mutated afterwards.

use super::action::Action;
use crate::core::error::{MIN_REASONING_CHARS, ValidationError};
use crate::util::{char_len, round2};
use serde::{Deserialize, Serialize};

/// Reasoning attached to the neutral vote synthesized for a failed agent
pub const FAILED_REASONING: &str = "agent error";

/// Reasoning attached to the neutral vote of an agent without analysis capability
pub const PLACEHOLDER_REASONING: &str = "agent has no analysis capability";

/// A single agent's recommendation
///
/// # Example
///
/// ```
/// use magi_domain::consensus::{Action, AgentVote};
///
/// let vote = AgentVote::new("Melchior", Action::Buy, 0.856, "Solid fundamentals, low PER").unwrap();
/// assert_eq!(vote.action(), Action::Buy);
/// assert_eq!(vote.confidence(), 0.86);
///
/// assert!(AgentVote::new("Melchior", Action::Buy, 1.5, "Out of range confidence").is_err());
/// assert!(AgentVote::new("Melchior", Action::Buy, 0.5, "Short").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawAgentVote")]
pub struct AgentVote {
    agent_name: String,
    action: Action,
    confidence: f64,
    reasoning: String,
}

/// Unvalidated wire shape; deserialization goes through [`AgentVote::new`]
#[derive(Deserialize)]
struct RawAgentVote {
    agent_name: String,
    action: Action,
    confidence: f64,
    reasoning: String,
}

impl TryFrom<RawAgentVote> for AgentVote {
    type Error = ValidationError;

    fn try_from(raw: RawAgentVote) -> Result<Self, Self::Error> {
        AgentVote::new(raw.agent_name, raw.action, raw.confidence, raw.reasoning)
    }
}

impl AgentVote {
    /// Create a new vote
    ///
    /// Confidence must lie in `[0.0, 1.0]` and is rounded to two decimals.
    /// Reasoning must be at least ten characters long.
    pub fn new(
        agent_name: impl Into<String>,
        action: Action,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let agent_name = agent_name.into();
        let reasoning = reasoning.into();

        if agent_name.trim().is_empty() {
            return Err(ValidationError::EmptyAgentName);
        }

        // NaN fails this check as well
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ValidationError::ConfidenceOutOfRange(confidence));
        }

        let len = char_len(&reasoning);
        if len < MIN_REASONING_CHARS {
            return Err(ValidationError::ReasoningTooShort {
                len,
                min: MIN_REASONING_CHARS,
            });
        }

        Ok(Self {
            agent_name,
            action,
            confidence: round2(confidence),
            reasoning,
        })
    }

    /// Neutral vote for an agent whose analysis failed or timed out
    ///
    /// `HOLD` with zero confidence.
    pub fn failed(agent_name: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(agent_name, Action::Hold, 0.0, FAILED_REASONING)
    }

    /// Neutral vote for an agent that cannot analyze at all
    ///
    /// `HOLD` with confidence 0.5.
    pub fn placeholder(agent_name: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(agent_name, Action::Hold, 0.5, PLACEHOLDER_REASONING)
    }

    /// Name of the agent that cast this vote
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Recommended action
    pub fn action(&self) -> Action {
        self.action
    }

    /// Confidence, rounded to two decimals
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Free-text justification
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Whether this is the neutral vote synthesized for a failed agent
    pub fn is_failure(&self) -> bool {
        self.action == Action::Hold && self.confidence == 0.0 && self.reasoning == FAILED_REASONING
    }
}
