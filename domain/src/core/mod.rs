//! Core domain concepts shared across all subdomains.
//!
//! - [`subject::Subject`]: the entity a consensus round is about
//! - [`error::ValidationError`]: construction-time validation failures

pub mod error;
pub mod subject;
