//! Progress notification port
//!
//! Defines the interface for reporting progress during a consensus round.

use magi_domain::{AgentVote, FinalDecision, Subject};

/// Callback for progress updates during a round
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait RoundProgress: Send + Sync {
    /// Called when a round starts
    fn on_round_start(&self, subject: &Subject, agent_count: usize);

    /// Called when an agent's vote is settled
    ///
    /// `succeeded` is false when the vote is a synthesized neutral vote.
    fn on_agent_complete(&self, agent_name: &str, vote: &AgentVote, succeeded: bool);

    /// Called once the decision has been built
    fn on_round_complete(&self, _decision: &FinalDecision) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl RoundProgress for NoProgress {
    fn on_round_start(&self, _subject: &Subject, _agent_count: usize) {}
    fn on_agent_complete(&self, _agent_name: &str, _vote: &AgentVote, _succeeded: bool) {}
}
