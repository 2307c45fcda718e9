//! Voting policies for consensus determination
//!
//! A policy reduces the collected votes of a round into a single [`Action`]
//! and, for richer policies, a weighted confidence.

use super::action::Action;
use super::decision::tally;
use super::vote::AgentVote;
use crate::util::round2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scores closer than this are treated as tied
const SCORE_EPSILON: f64 = 1e-9;

/// Errors raised while evaluating a policy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Unsupported voting policy: {0}. Valid: majority, weighted")]
    Unsupported(String),
}

/// How ties at the top of the count are broken
///
/// The choice is explicit configuration rather than an accident of
/// iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The tied action whose first vote appears earliest wins
    #[default]
    FirstSeen,
    /// Any tie resolves to HOLD
    Hold,
}

impl TieBreak {
    /// Pick a winner among tied actions (given in first-seen order)
    fn resolve(&self, tied: &[Action]) -> Action {
        match (self, tied) {
            (_, []) => Action::Hold,
            (_, [only]) => *only,
            (TieBreak::FirstSeen, [first, ..]) => *first,
            (TieBreak::Hold, _) => Action::Hold,
        }
    }
}

impl std::fmt::Display for TieBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieBreak::FirstSeen => write!(f, "first_seen"),
            TieBreak::Hold => write!(f, "hold"),
        }
    }
}

impl std::str::FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "first_seen" | "first" => Ok(TieBreak::FirstSeen),
            "hold" => Ok(TieBreak::Hold),
            _ => Err(format!(
                "Unknown tie-break: {}. Valid: first_seen, hold",
                s
            )),
        }
    }
}

/// Result of evaluating a policy over a vote collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyOutcome {
    /// The winning action
    pub action: Action,
    /// Confidence-weighted support for the winner, if the policy computes one
    pub weighted_confidence: Option<f64>,
}

impl PolicyOutcome {
    fn plain(action: Action) -> Self {
        Self {
            action,
            weighted_confidence: None,
        }
    }
}

/// Voting policy
///
/// Selected by a configuration string. Unknown strings are accepted and kept
/// as [`VotingPolicy::Unsupported`]; evaluating such a policy fails with
/// [`PolicyError::Unsupported`].
///
/// # Example
///
/// ```
/// use magi_domain::consensus::{Action, AgentVote, TieBreak, VotingPolicy};
///
/// let votes = vec![
///     AgentVote::new("a", Action::Buy, 0.8, "Fundamentals are strong").unwrap(),
///     AgentVote::new("b", Action::Buy, 0.7, "Trend continues upward").unwrap(),
///     AgentVote::new("c", Action::Sell, 0.6, "Sentiment is deteriorating").unwrap(),
/// ];
///
/// let policy: VotingPolicy = "majority".parse().unwrap();
/// assert_eq!(policy.evaluate_action(&votes, TieBreak::default()), Ok(Action::Buy));
///
/// let unknown: VotingPolicy = "ranked".parse().unwrap();
/// assert!(unknown.evaluate_action(&votes, TieBreak::default()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum VotingPolicy {
    /// The action with the most votes wins
    #[default]
    Majority,
    /// The action with the highest summed confidence wins
    Weighted,
    /// An identifier this engine does not implement
    Unsupported(String),
}

impl VotingPolicy {
    /// Get the configuration identifier of this policy
    pub fn as_str(&self) -> &str {
        match self {
            VotingPolicy::Majority => "majority",
            VotingPolicy::Weighted => "weighted",
            VotingPolicy::Unsupported(name) => name,
        }
    }

    /// Check whether this policy can be evaluated
    pub fn is_supported(&self) -> bool {
        !matches!(self, VotingPolicy::Unsupported(_))
    }

    /// Get a human-readable description of this policy
    pub fn description(&self) -> String {
        match self {
            VotingPolicy::Majority => "majority (most votes wins)".to_string(),
            VotingPolicy::Weighted => "weighted (highest summed confidence wins)".to_string(),
            VotingPolicy::Unsupported(name) => format!("unsupported ({})", name),
        }
    }

    /// Reduce the votes into an outcome
    ///
    /// An empty collection yields `HOLD` for every supported policy.
    pub fn evaluate(
        &self,
        votes: &[AgentVote],
        tie_break: TieBreak,
    ) -> Result<PolicyOutcome, PolicyError> {
        match self {
            VotingPolicy::Majority => Ok(majority(votes, tie_break)),
            VotingPolicy::Weighted => Ok(weighted(votes, tie_break)),
            VotingPolicy::Unsupported(name) => Err(PolicyError::Unsupported(name.clone())),
        }
    }

    /// Reduce the votes into a single action
    pub fn evaluate_action(
        &self,
        votes: &[AgentVote],
        tie_break: TieBreak,
    ) -> Result<Action, PolicyError> {
        self.evaluate(votes, tie_break).map(|outcome| outcome.action)
    }
}

fn majority(votes: &[AgentVote], tie_break: TieBreak) -> PolicyOutcome {
    let counts = tally(votes);
    let Some(max) = counts.iter().map(|(_, c)| *c).max() else {
        return PolicyOutcome::plain(Action::Hold);
    };

    let tied: Vec<Action> = counts
        .iter()
        .filter(|(_, c)| *c == max)
        .map(|(a, _)| *a)
        .collect();

    PolicyOutcome::plain(tie_break.resolve(&tied))
}

fn weighted(votes: &[AgentVote], tie_break: TieBreak) -> PolicyOutcome {
    if votes.is_empty() {
        return PolicyOutcome::plain(Action::Hold);
    }

    // Summed confidence per action, first-seen order
    let mut scores: Vec<(Action, f64)> = Vec::new();
    for vote in votes {
        match scores.iter_mut().find(|(a, _)| *a == vote.action()) {
            Some((_, score)) => *score += vote.confidence(),
            None => scores.push((vote.action(), vote.confidence())),
        }
    }

    let max = scores
        .iter()
        .map(|(_, s)| *s)
        .fold(f64::NEG_INFINITY, f64::max);

    let tied: Vec<Action> = scores
        .iter()
        .filter(|(_, s)| (max - *s).abs() < SCORE_EPSILON)
        .map(|(a, _)| *a)
        .collect();

    let action = tie_break.resolve(&tied);
    let support = scores
        .iter()
        .find(|(a, _)| *a == action)
        .map(|(_, s)| *s)
        .unwrap_or(0.0);

    PolicyOutcome {
        action,
        weighted_confidence: Some(round2(support / votes.len() as f64).clamp(0.0, 1.0)),
    }
}

impl std::fmt::Display for VotingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VotingPolicy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "majority" => VotingPolicy::Majority,
            "weighted" => VotingPolicy::Weighted,
            _ => VotingPolicy::Unsupported(s.to_string()),
        })
    }
}

impl From<String> for VotingPolicy {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(policy) => policy,
            Err(never) => match never {},
        }
    }
}

impl From<VotingPolicy> for String {
    fn from(policy: VotingPolicy) -> Self {
        policy.as_str().to_string()
    }
}
