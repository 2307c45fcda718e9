//! Audit infrastructure: append-only JSONL decision log.
//!
//! Provides [`JsonlAuditSink`], a JSONL file writer that implements the
//! [`AuditSink`](magi_application::AuditSink) port, and [`read_records`] for
//! replaying a log back into records.

mod jsonl_sink;

pub use jsonl_sink::{AuditReadError, JsonlAuditSink, read_records};
