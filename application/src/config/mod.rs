//! Application-level configuration.
//!
//! - [`RoundParams`]: round control (per-agent timeout, fan-out, conflict
//!   detection, tie-break)

pub mod round_params;

pub use round_params::RoundParams;
