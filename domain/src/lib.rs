//! Domain layer for magi-consensus
//!
//! This crate contains the value types and voting policies of the consensus
//! engine. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Vote** ([`AgentVote`]): one agent's recommendation, confidence and
//!   justification for one round
//! - **Decision** ([`FinalDecision`]): the aggregated outcome of a round
//! - **Voting policy** ([`VotingPolicy`]): reduces votes to a single [`Action`]
//! - **Subject** ([`Subject`]): the entity being analyzed, opaque to the core

pub mod consensus;
pub mod core;
pub mod util;

// Re-export commonly used types
pub use consensus::{
    Action, AgentVote, AnalysisReport, FinalDecision, PolicyError, PolicyOutcome, TieBreak,
    VotingPolicy, has_opposing_votes,
};
pub use core::{error::ValidationError, subject::Subject};
