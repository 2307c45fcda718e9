//! Reach Consensus use case
//!
//! Runs one aggregation round: consult every agent, reduce the votes with
//! the configured voting policy, build the [`FinalDecision`], and append it
//! to the audit log.
//!
//! ```text
//! RoundContext ──► agent[0] ──┐
//!              ──► agent[1] ──┼──► Vec<AgentVote> ──► VotingPolicy ──► FinalDecision ──► AuditSink
//!              ──► agent[n] ──┘   (submission order)
//! ```

use crate::config::RoundParams;
use crate::ports::analyst::{Agent, AgentCapability, AgentError, Analyst};
use crate::ports::audit_sink::{AuditRecord, AuditSink};
use crate::ports::progress::{NoProgress, RoundProgress};
use futures::future::join_all;
use magi_domain::{
    Action, AgentVote, AnalysisReport, FinalDecision, PolicyError, Subject, ValidationError,
    VotingPolicy, has_opposing_votes,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can end a round
///
/// Individual agent failures are not among them: those are recovered with a
/// neutral vote.
#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error("No agents configured")]
    NoAgents,

    #[error("Unsupported voting policy: {0}")]
    UnsupportedPolicy(String),

    #[error("Round cancelled")]
    Cancelled,

    #[error("Invalid decision: {0}")]
    InvalidDecision(#[from] ValidationError),
}

impl ConsensusError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConsensusError::Cancelled)
    }
}

impl From<PolicyError> for ConsensusError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Unsupported(name) => ConsensusError::UnsupportedPolicy(name),
        }
    }
}

/// Input for one round
///
/// Deserializes from `{"subject": "...", "analysis_result": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundContext {
    /// What the agents analyze
    pub subject: Subject,
    /// Pre-computed result that stands in for the first agent's analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<AnalysisReport>,
}

impl RoundContext {
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            analysis_result: None,
        }
    }

    pub fn with_analysis_result(mut self, report: AnalysisReport) -> Self {
        self.analysis_result = Some(report);
        self
    }
}

/// Orchestrates consensus rounds over a fixed, ordered set of agents
pub struct ConsensusOrchestrator {
    agents: Vec<Agent>,
    policy: VotingPolicy,
    params: RoundParams,
    audit_sink: Option<Arc<dyn AuditSink>>,
    cancellation_token: Option<CancellationToken>,
}

impl ConsensusOrchestrator {
    pub fn new(agents: Vec<Agent>, policy: VotingPolicy) -> Self {
        Self {
            agents,
            policy,
            params: RoundParams::default(),
            audit_sink: None,
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: RoundParams) -> Self {
        self.params = params;
        self
    }

    /// Append every completed round to `sink`
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn policy(&self) -> &VotingPolicy {
        &self.policy
    }

    pub fn params(&self) -> &RoundParams {
        &self.params
    }

    /// Run one round with default (no-op) progress
    pub async fn reach_consensus(&self, ctx: RoundContext) -> Result<FinalDecision, ConsensusError> {
        self.reach_consensus_with_progress(ctx, &NoProgress).await
    }

    /// Run one round with progress callbacks
    ///
    /// Returns a complete decision with one vote per agent, in agent order,
    /// or an error; never a partial decision.
    pub async fn reach_consensus_with_progress(
        &self,
        ctx: RoundContext,
        progress: &dyn RoundProgress,
    ) -> Result<FinalDecision, ConsensusError> {
        if self.agents.is_empty() {
            return Err(ConsensusError::NoAgents);
        }

        // Fail before consulting anyone
        if let VotingPolicy::Unsupported(name) = &self.policy {
            return Err(ConsensusError::UnsupportedPolicy(name.clone()));
        }

        info!(
            subject = %ctx.subject,
            agents = self.agents.len(),
            policy = %self.policy,
            "Starting consensus round"
        );
        progress.on_round_start(&ctx.subject, self.agents.len());

        let collect = self.collect_votes(&ctx, progress);
        let votes = match &self.cancellation_token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    warn!(subject = %ctx.subject, "Consensus round cancelled");
                    return Err(ConsensusError::Cancelled);
                }
                votes = collect => votes,
            },
            None => collect.await,
        }?;

        let outcome = self.policy.evaluate(&votes, self.params.tie_break)?;
        let has_conflict = self.params.detect_conflicts && has_opposing_votes(&votes);
        let summary = summarize(votes.len(), outcome.action);

        let mut decision =
            FinalDecision::new(outcome.action, votes, summary)?.with_conflict(has_conflict);
        if let Some(weighted) = outcome.weighted_confidence {
            decision = decision.with_weighted_confidence(weighted)?;
        }

        info!(
            subject = %ctx.subject,
            action = %decision.final_action(),
            votes = decision.vote_count(),
            has_conflict = decision.has_conflict(),
            "Consensus reached"
        );

        self.record(&ctx.subject, &decision);
        progress.on_round_complete(&decision);

        Ok(decision)
    }

    /// Apply this orchestrator's policy to votes directly, without a round
    pub fn evaluate_policy(&self, votes: &[AgentVote]) -> Result<Action, ConsensusError> {
        Ok(self.policy.evaluate_action(votes, self.params.tie_break)?)
    }

    /// Consult every agent, returning votes in submission order
    async fn collect_votes(
        &self,
        ctx: &RoundContext,
        progress: &dyn RoundProgress,
    ) -> Result<Vec<AgentVote>, ConsensusError> {
        let pending = self
            .agents
            .iter()
            .enumerate()
            .map(move |(index, agent)| self.consult(index, agent, ctx, progress));

        let settled = if self.params.concurrent {
            join_all(pending).await
        } else {
            let mut settled = Vec::with_capacity(self.agents.len());
            for vote in pending {
                settled.push(vote.await);
            }
            settled
        };

        Ok(settled.into_iter().collect::<Result<Vec<_>, _>>()?)
    }

    /// Settle one agent's vote; only an invalid agent name can fail here
    async fn consult(
        &self,
        index: usize,
        agent: &Agent,
        ctx: &RoundContext,
        progress: &dyn RoundProgress,
    ) -> Result<AgentVote, ValidationError> {
        let name = agent.name();

        // A pre-computed result replaces the first agent's own analysis
        if index == 0
            && let Some(report) = &ctx.analysis_result
        {
            let (vote, succeeded) = match report.clone().into_vote(name) {
                Ok(vote) => {
                    debug!(agent = name, action = %vote.action(), "Using pre-computed analysis");
                    (vote, true)
                }
                Err(e) => {
                    warn!(agent = name, error = %e, "Pre-computed analysis invalid; casting neutral vote");
                    (AgentVote::failed(name)?, false)
                }
            };
            progress.on_agent_complete(name, &vote, succeeded);
            return Ok(vote);
        }

        let (vote, succeeded) = match agent.capability() {
            AgentCapability::Inert => {
                debug!(agent = name, "Agent cannot analyze; casting placeholder vote");
                (AgentVote::placeholder(name)?, true)
            }
            AgentCapability::Analyzable(analyst) => {
                let result = self
                    .analyze(analyst.as_ref(), &ctx.subject)
                    .await
                    .and_then(|report| report.into_vote(name).map_err(AgentError::from));
                match result {
                    Ok(vote) => {
                        info!(
                            agent = name,
                            action = %vote.action(),
                            confidence = vote.confidence(),
                            "Agent voted"
                        );
                        (vote, true)
                    }
                    Err(e) => {
                        warn!(agent = name, error = %e, "Agent failed; casting neutral vote");
                        (AgentVote::failed(name)?, false)
                    }
                }
            }
        };

        progress.on_agent_complete(name, &vote, succeeded);
        Ok(vote)
    }

    /// Run one analysis, bounded by the per-agent timeout
    async fn analyze(
        &self,
        analyst: &dyn Analyst,
        subject: &Subject,
    ) -> Result<AnalysisReport, AgentError> {
        let analysis = analyst.analyze(subject);
        match self.params.agent_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, analysis).await {
                Ok(result) => result,
                Err(_) => Err(AgentError::Timeout(timeout)),
            },
            None => analysis.await,
        }
    }

    /// Append the decision to the audit sink; failures are logged, not raised
    fn record(&self, subject: &Subject, decision: &FinalDecision) {
        let Some(sink) = &self.audit_sink else {
            return;
        };

        let record = AuditRecord::from_decision(subject, decision);
        match sink.append(&record) {
            Ok(()) => debug!(subject = %subject, "Audit record written"),
            Err(e) => warn!(subject = %subject, error = %e, "Failed to write audit record"),
        }
    }
}

fn summarize(count: usize, action: Action) -> String {
    let noun = if count == 1 { "vote" } else { "votes" };
    format!("{} agent {} collected; final action: {}", count, noun, action)
}
