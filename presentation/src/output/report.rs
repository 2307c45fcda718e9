//! Serializable response body for a decision

use magi_domain::{Action, AgentVote, FinalDecision, Subject};
use serde::{Deserialize, Serialize};

/// One agent's line in the breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteBreakdown {
    pub agent: String,
    pub action: Action,
    pub confidence: f64,
    pub reasoning: String,
}

impl From<&AgentVote> for VoteBreakdown {
    fn from(vote: &AgentVote) -> Self {
        Self {
            agent: vote.agent_name().to_string(),
            action: vote.action(),
            confidence: vote.confidence(),
            reasoning: vote.reasoning().to_string(),
        }
    }
}

/// Response body: `{subject, final_action, confidence, summary, reasoning, has_conflict}`
///
/// `confidence` is the decision's weighted confidence and is `null` for
/// policies that do not compute one. `reasoning` is `null` when the
/// per-agent breakdown was not requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionReport {
    pub subject: Subject,
    pub final_action: Action,
    pub confidence: Option<f64>,
    pub summary: String,
    #[serde(default)]
    pub reasoning: Option<Vec<VoteBreakdown>>,
    pub has_conflict: bool,
}

impl DecisionReport {
    pub fn new(subject: &Subject, decision: &FinalDecision, include_reasoning: bool) -> Self {
        Self {
            subject: subject.clone(),
            final_action: decision.final_action(),
            confidence: decision.weighted_confidence(),
            summary: decision.summary().to_string(),
            reasoning: include_reasoning
                .then(|| decision.votes().iter().map(VoteBreakdown::from).collect()),
            has_conflict: decision.has_conflict(),
        }
    }
}
