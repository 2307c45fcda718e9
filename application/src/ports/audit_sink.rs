//! Port for the append-only audit log of consensus rounds.
//!
//! Defines the [`AuditSink`] trait and the [`AuditRecord`] written once per
//! completed round.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while the audit log captures each round's
//! inputs and outputs in a machine-readable format (one JSON object per line)
//! for replay and debugging.

use chrono::{DateTime, SecondsFormat, Utc};
use magi_domain::{Action, AgentVote, FinalDecision, Subject};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to append an audit record
///
/// The orchestrator logs and swallows this; it never fails a round.
#[derive(Error, Debug)]
pub enum AuditWriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Audit sink unavailable: {0}")]
    Unavailable(String),
}

/// One round's audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// When the round completed (ISO-8601, UTC)
    #[serde(with = "rfc3339_millis")]
    pub timestamp: DateTime<Utc>,
    pub subject: Subject,
    pub final_action: Action,
    pub summary: String,
    /// Per-agent breakdown in consultation order
    pub votes: Vec<AgentVote>,
}

impl AuditRecord {
    /// Build a record for `decision`, stamped with the current time
    pub fn from_decision(subject: &Subject, decision: &FinalDecision) -> Self {
        Self::at(Utc::now(), subject, decision)
    }

    /// Build a record with an explicit timestamp
    pub fn at(timestamp: DateTime<Utc>, subject: &Subject, decision: &FinalDecision) -> Self {
        Self {
            timestamp: truncate_to_millis(timestamp),
            subject: subject.clone(),
            final_action: decision.final_action(),
            summary: decision.summary().to_string(),
            votes: decision.votes().to_vec(),
        }
    }

    /// Serialize as a single JSON line (no trailing newline)
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse one JSON line back into a record
    pub fn parse_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}

/// Timestamps are written with millisecond precision, so records are kept at
/// that precision to compare equal after a round-trip.
fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

mod rfc3339_millis {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Port for appending audit records.
///
/// Implementations must write each record as one atomic unit (e.g. one whole
/// line) so concurrent rounds never interleave partial records.
pub trait AuditSink: Send + Sync {
    /// Append a record
    fn append(&self, record: &AuditRecord) -> Result<(), AuditWriteError>;
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditSink;

impl AuditSink for NoAuditSink {
    fn append(&self, _record: &AuditRecord) -> Result<(), AuditWriteError> {
        Ok(())
    }
}
