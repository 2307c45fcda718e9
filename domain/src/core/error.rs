//! Domain error types

use thiserror::Error;

/// Minimum length (in characters) of an agent's reasoning.
pub const MIN_REASONING_CHARS: usize = 10;

/// Minimum length (in characters) of a decision summary.
pub const MIN_SUMMARY_CHARS: usize = 20;

/// Raised when a vote or decision is constructed with invalid data.
///
/// Validation always happens at construction; values are never silently
/// coerced beyond the two-decimal confidence normalization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Agent name must not be empty")]
    EmptyAgentName,

    #[error("Confidence must be between 0.0 and 1.0, got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("Reasoning must be at least {min} characters, got {len}")]
    ReasoningTooShort { len: usize, min: usize },

    #[error("Summary must be at least {min} characters, got {len}")]
    SummaryTooShort { len: usize, min: usize },

    #[error("At least one agent vote is required")]
    NoVotes,

    #[error("Weighted confidence must be between 0.0 and 1.0, got {0}")]
    WeightedConfidenceOutOfRange(f64),

    #[error("Subject must not be empty")]
    EmptySubject,
}
