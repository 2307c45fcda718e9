//! Infrastructure layer for magi-consensus
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the JSONL audit log, configuration file
//! loading, and the reference analysts.

pub mod analysts;
pub mod audit;
pub mod config;

// Re-export commonly used types
pub use analysts::{
    FundamentalAnalyst, PriceFeed, PriceSnapshot, SentimentAnalyst, StaticPriceFeed,
    TechnicalAnalyst, default_agents,
};
pub use audit::{AuditReadError, JsonlAuditSink, read_records};
pub use config::{ConfigError, ConfigIssue, ConfigLoader, FileConfig};
