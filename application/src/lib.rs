//! Application layer for magi-consensus
//!
//! This crate contains the consensus use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::RoundParams;
pub use ports::{
    analyst::{Agent, AgentCapability, AgentError, Analyst},
    audit_sink::{AuditRecord, AuditSink, AuditWriteError, NoAuditSink},
    progress::{NoProgress, RoundProgress},
};
pub use use_cases::reach_consensus::{ConsensusError, ConsensusOrchestrator, RoundContext};
