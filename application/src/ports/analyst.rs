//! Analyst capability port
//!
//! Defines the only capability the orchestrator depends on: producing an
//! [`AnalysisReport`] for a [`Subject`]. Concrete heuristics (fundamental,
//! technical, LLM-backed, ...) live in adapters.

use async_trait::async_trait;
use magi_domain::{AnalysisReport, Subject, ValidationError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while an agent analyzes a subject
///
/// These are recovered by the orchestrator (the agent gets a neutral vote)
/// and never reach the caller of a round.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Analysis failed: {0}")]
    Failed(String),

    #[error("Analysis timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Invalid analysis report: {0}")]
    InvalidReport(#[from] ValidationError),
}

/// Something that can analyze a subject
#[async_trait]
pub trait Analyst: Send + Sync {
    /// Produce a recommendation for `subject`
    async fn analyze(&self, subject: &Subject) -> Result<AnalysisReport, AgentError>;
}

/// What an agent can do, fixed when the agent is registered
#[derive(Clone)]
pub enum AgentCapability {
    /// The agent produces reports through an [`Analyst`]
    Analyzable(Arc<dyn Analyst>),
    /// The agent cannot analyze; it always casts a neutral placeholder vote
    Inert,
}

impl std::fmt::Debug for AgentCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentCapability::Analyzable(_) => write!(f, "Analyzable"),
            AgentCapability::Inert => write!(f, "Inert"),
        }
    }
}

/// A named participant in consensus rounds
///
/// Names are used for audit and display only; they need not be unique, but
/// they must not be blank. Both the name and the capability are fixed at
/// registration.
#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    capability: AgentCapability,
}

impl Agent {
    /// Register an agent backed by an analyst
    pub fn analyzable(
        name: impl Into<String>,
        analyst: impl Analyst + 'static,
    ) -> Result<Self, ValidationError> {
        Self::register(name.into(), AgentCapability::Analyzable(Arc::new(analyst)))
    }

    /// Register an agent with no analysis capability
    pub fn inert(name: impl Into<String>) -> Result<Self, ValidationError> {
        Self::register(name.into(), AgentCapability::Inert)
    }

    fn register(name: String, capability: AgentCapability) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyAgentName);
        }
        Ok(Self { name, capability })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capability(&self) -> &AgentCapability {
        &self.capability
    }

    /// Check whether this agent can analyze
    pub fn is_analyzable(&self) -> bool {
        matches!(self.capability, AgentCapability::Analyzable(_))
    }
}
