//! Presentation layer for magi-consensus
//!
//! This crate contains CLI definitions, output formatters,
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{AgentKind, Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::report::{DecisionReport, VoteBreakdown};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
