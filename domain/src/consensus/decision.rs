//! Aggregated outcome of a consensus round

use super::action::Action;
use super::vote::AgentVote;
use crate::core::error::{MIN_SUMMARY_CHARS, ValidationError};
use crate::util::{char_len, round2};
use serde::{Deserialize, Serialize};

/// Final decision of one round
///
/// Invariants, checked at construction and on deserialization:
/// - `votes` is never empty and keeps the order agents were consulted in
/// - `summary` has at least twenty characters
/// - `weighted_confidence`, when set, lies in `[0.0, 1.0]`
///
/// `has_conflict` is whatever the caller supplied; it is not derived from
/// the votes. See [`has_opposing_votes`] for an opt-in heuristic.
///
/// # Example
///
/// ```
/// use magi_domain::consensus::{Action, AgentVote, FinalDecision};
///
/// let votes = vec![
///     AgentVote::new("Melchior", Action::Buy, 0.85, "Fundamentals look healthy").unwrap(),
///     AgentVote::new("Balthasar", Action::Buy, 0.75, "Uptrend is still intact").unwrap(),
/// ];
/// let decision = FinalDecision::new(Action::Buy, votes, "Both agents recommend buying the stock.")
///     .unwrap()
///     .with_weighted_confidence(0.80)
///     .unwrap();
///
/// assert_eq!(decision.vote_count(), 2);
/// assert_eq!(decision.weighted_confidence(), Some(0.8));
/// assert!(!decision.has_conflict());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawFinalDecision")]
pub struct FinalDecision {
    final_action: Action,
    votes: Vec<AgentVote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weighted_confidence: Option<f64>,
    summary: String,
    has_conflict: bool,
}

#[derive(Deserialize)]
struct RawFinalDecision {
    final_action: Action,
    votes: Vec<AgentVote>,
    #[serde(default)]
    weighted_confidence: Option<f64>,
    summary: String,
    #[serde(default)]
    has_conflict: bool,
}

impl TryFrom<RawFinalDecision> for FinalDecision {
    type Error = ValidationError;

    fn try_from(raw: RawFinalDecision) -> Result<Self, Self::Error> {
        let decision = FinalDecision::new(raw.final_action, raw.votes, raw.summary)?
            .with_conflict(raw.has_conflict);
        match raw.weighted_confidence {
            Some(value) => decision.with_weighted_confidence(value),
            None => Ok(decision),
        }
    }
}

impl FinalDecision {
    /// Create a new decision without weighted confidence and without conflict
    pub fn new(
        final_action: Action,
        votes: Vec<AgentVote>,
        summary: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let summary = summary.into();

        if votes.is_empty() {
            return Err(ValidationError::NoVotes);
        }

        let len = char_len(&summary);
        if len < MIN_SUMMARY_CHARS {
            return Err(ValidationError::SummaryTooShort {
                len,
                min: MIN_SUMMARY_CHARS,
            });
        }

        Ok(Self {
            final_action,
            votes,
            weighted_confidence: None,
            summary,
            has_conflict: false,
        })
    }

    /// Attach a weighted confidence (rounded to two decimals)
    pub fn with_weighted_confidence(mut self, value: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::WeightedConfidenceOutOfRange(value));
        }
        self.weighted_confidence = Some(round2(value));
        Ok(self)
    }

    /// Set the conflict flag
    pub fn with_conflict(mut self, has_conflict: bool) -> Self {
        self.has_conflict = has_conflict;
        self
    }

    pub fn final_action(&self) -> Action {
        self.final_action
    }

    /// Votes in the order agents were consulted
    pub fn votes(&self) -> &[AgentVote] {
        &self.votes
    }

    pub fn weighted_confidence(&self) -> Option<f64> {
        self.weighted_confidence
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn has_conflict(&self) -> bool {
        self.has_conflict
    }

    /// Number of votes (always at least one)
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    /// Per-action vote counts in first-seen order
    pub fn tally(&self) -> Vec<(Action, usize)> {
        tally(&self.votes)
    }

    /// Check whether every vote recommends the same action
    pub fn is_unanimous(&self) -> bool {
        self.votes
            .iter()
            .all(|v| v.action() == self.votes[0].action())
    }
}

/// Count votes per action, keeping the order in which each action first appears
pub fn tally(votes: &[AgentVote]) -> Vec<(Action, usize)> {
    let mut counts: Vec<(Action, usize)> = Vec::new();
    for vote in votes {
        match counts.iter_mut().find(|(action, _)| *action == vote.action()) {
            Some((_, count)) => *count += 1,
            None => counts.push((vote.action(), 1)),
        }
    }
    counts
}

/// Opt-in conflict heuristic
///
/// True when BUY and SELL both appear, or when no action holds a strict
/// majority of the votes. Never applied by [`FinalDecision`] itself.
pub fn has_opposing_votes(votes: &[AgentVote]) -> bool {
    if votes.is_empty() {
        return false;
    }

    let counts = tally(votes);
    let has = |a: Action| counts.iter().any(|(action, _)| *action == a);
    if has(Action::Buy) && has(Action::Sell) {
        return true;
    }

    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    max <= votes.len() / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(name: &str, action: Action, confidence: f64) -> AgentVote {
        AgentVote::new(name, action, confidence, "Reasoning for this test vote").unwrap()
    }

    #[test]
    fn test_final_decision_valid() {
        let votes = vec![vote("Melchior", Action::Buy, 0.85), vote("Balthasar", Action::Buy, 0.75)];
        let decision = FinalDecision::new(
            Action::Buy,
            votes,
            "Two agents recommend BUY on both fundamentals and technicals.",
        )
        .unwrap()
        .with_weighted_confidence(0.80)
        .unwrap();

        assert_eq!(decision.final_action(), Action::Buy);
        assert_eq!(decision.vote_count(), 2);
        assert_eq!(decision.weighted_confidence(), Some(0.80));
        assert!(!decision.has_conflict());
        assert!(decision.is_unanimous());
    }

    #[test]
    fn test_empty_votes_rejected() {
        let err = FinalDecision::new(
            Action::Hold,
            vec![],
            "No agents were available so no decision exists.",
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::NoVotes);
    }

    #[test]
    fn test_summary_min_length() {
        let votes = vec![vote("Melchior", Action::Hold, 0.5)];
        let err = FinalDecision::new(Action::Hold, votes.clone(), "Short").unwrap_err();
        assert_eq!(err, ValidationError::SummaryTooShort { len: 5, min: 20 });

        assert!(FinalDecision::new(Action::Hold, votes, "exactly twenty chars").is_ok());
    }

    #[test]
    fn test_weighted_confidence_range() {
        let votes = vec![vote("Melchior", Action::Hold, 0.5)];
        let decision =
            FinalDecision::new(Action::Hold, votes, "One agent voted HOLD this round.").unwrap();
        assert!(decision.clone().with_weighted_confidence(1.2).is_err());
        assert!(decision.clone().with_weighted_confidence(-0.2).is_err());
        assert_eq!(
            decision.with_weighted_confidence(0.456).unwrap().weighted_confidence(),
            Some(0.46)
        );
    }

    #[test]
    fn test_conflict_is_caller_supplied() {
        let votes = vec![vote("Melchior", Action::Buy, 0.8), vote("Casper", Action::Sell, 0.7)];
        let decision = FinalDecision::new(
            Action::Hold,
            votes.clone(),
            "Agents disagree so HOLD is recommended.",
        )
        .unwrap();
        // Not derived from the votes
        assert!(!decision.has_conflict());

        let flagged = decision.with_conflict(true);
        assert!(flagged.has_conflict());
        assert!(has_opposing_votes(&votes));
    }

    #[test]
    fn test_tally_first_seen_order() {
        let votes = vec![
            vote("a", Action::Sell, 0.6),
            vote("b", Action::Buy, 0.8),
            vote("c", Action::Buy, 0.7),
        ];
        assert_eq!(tally(&votes), vec![(Action::Sell, 1), (Action::Buy, 2)]);
    }

    #[test]
    fn test_has_opposing_votes() {
        let clear = vec![
            vote("a", Action::Buy, 0.8),
            vote("b", Action::Buy, 0.7),
            vote("c", Action::Hold, 0.5),
        ];
        assert!(!has_opposing_votes(&clear));

        let split = vec![vote("a", Action::Buy, 0.8), vote("b", Action::Hold, 0.5)];
        assert!(has_opposing_votes(&split));

        assert!(!has_opposing_votes(&[]));
    }

    #[test]
    fn test_deserialize_rejects_empty_votes() {
        let json = r#"{"final_action":"HOLD","votes":[],"summary":"No votes were collected at all.","has_conflict":false}"#;
        assert!(serde_json::from_str::<FinalDecision>(json).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let votes = vec![vote("Melchior", Action::Buy, 0.8), vote("Casper", Action::Sell, 0.6)];
        let decision = FinalDecision::new(Action::Buy, votes, "2 agent votes collected; final action: BUY")
            .unwrap()
            .with_conflict(true);
        let json = serde_json::to_string(&decision).unwrap();
        assert!(!json.contains("weighted_confidence"));
        let parsed: FinalDecision = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, decision);
    }
}
