//! Consensus domain
//!
//! Value types and policies for multi-agent consensus decisions.
//!
//! # Flow
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  Analyst A   │   │  Analyst B   │   │  Analyst C   │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        │ AnalysisReport   │                  │
//!        ▼                  ▼                  ▼
//! ┌─────────────────────────────────────────────────────┐
//! │  AgentVote × N  (validated, insertion order)         │
//! └─────────────────────────┬───────────────────────────┘
//!                           │ VotingPolicy + TieBreak
//!                           ▼
//! ┌─────────────────────────────────────────────────────┐
//! │  FinalDecision  (final action, votes, summary)       │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod action;
pub mod decision;
pub mod policy;
pub mod report;
pub mod vote;

// Re-export main types
pub use action::Action;
pub use decision::{FinalDecision, has_opposing_votes, tally};
pub use policy::{PolicyError, PolicyOutcome, TieBreak, VotingPolicy};
pub use report::{AnalysisReport, DEFAULT_CONFIDENCE};
pub use vote::{AgentVote, FAILED_REASONING, PLACEHOLDER_REASONING};
